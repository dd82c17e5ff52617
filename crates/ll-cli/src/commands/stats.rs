use std::path::Path;

use colored::Colorize;
use ll_dpr::RollMode;

pub fn run(file: &Path, names: &[String], ac: f64, mode: Option<RollMode>) -> Result<(), String> {
    let bestiary = super::load_bestiary(file)?;
    let group = bestiary
        .encounter("group", names)
        .map_err(|e| e.to_string())?;
    let mode = mode.unwrap_or(bestiary.report.roll_mode);
    let decimals = bestiary.report.decimals;
    let stats = group.combat_stats(ac, mode);

    println!(
        "  {} ({} creatures) vs AC {}",
        "Group".bold(),
        group.len(),
        super::format_ac(ac)
    );
    println!();
    println!("  dpr:         {}", super::format_dpr(Some(stats.dpr), decimals));
    println!("  average ac:  {:.1}", stats.average_ac);
    println!("  weighted ac: {:.1}", stats.weighted_ac);
    println!("  hp:          {}", stats.hit_points);

    let unknown: Vec<&str> = group
        .members()
        .iter()
        .filter(|c| c.dpr_with(ac, mode).is_none())
        .map(|c| c.name.as_str())
        .collect();
    if !unknown.is_empty() {
        println!();
        println!(
            "  {}  DPR unknown for: {}",
            "WARN".yellow().bold(),
            unknown.join(", ")
        );
    }

    Ok(())
}
