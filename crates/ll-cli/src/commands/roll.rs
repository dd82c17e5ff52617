use colored::Colorize;
use ll_dpr::DiceExpr;
use rand::SeedableRng;
use rand::rngs::StdRng;

pub fn run(expr: &str, times: u32, seed: Option<u64>) -> Result<(), String> {
    let dice = DiceExpr::parse(expr).map_err(|e| e.to_string())?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!(
        "  {} {dice}  (avg {:.1}, {}..{})",
        "Rolling".bold(),
        dice.average(),
        dice.min(),
        dice.max()
    );
    for _ in 0..times.max(1) {
        let roll = dice.roll(&mut rng);
        println!("  {roll}");
    }

    Ok(())
}
