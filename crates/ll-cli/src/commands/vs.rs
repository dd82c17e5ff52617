use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use ll_dpr::{AcBasis, RollMode, Side};

pub fn run(
    file: &Path,
    ours: &[String],
    theirs: &[String],
    average: bool,
    mode: Option<RollMode>,
) -> Result<(), String> {
    let bestiary = super::load_bestiary(file)?;
    let us = bestiary
        .encounter(ours.join(", "), ours)
        .map_err(|e| e.to_string())?;
    let them = bestiary
        .encounter(theirs.join(", "), theirs)
        .map_err(|e| e.to_string())?;

    let basis = if average {
        AcBasis::Average
    } else {
        AcBasis::Weighted
    };
    let mode = mode.unwrap_or(bestiary.report.roll_mode);
    let decimals = bestiary.report.decimals;
    let matchup = us.vs(&them, basis, mode);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Side", "Weighted AC", "Avg AC", "HP", "DPR", "Turns"]);
    for side in [&matchup.ours, &matchup.theirs] {
        table.add_row(row(side, decimals));
    }
    println!("{table}");
    println!();

    let winner = match (
        matchup.ours.turns_to_victory,
        matchup.theirs.turns_to_victory,
    ) {
        (Some(a), Some(b)) if a < b => Some(&matchup.ours.name),
        (Some(a), Some(b)) if b < a => Some(&matchup.theirs.name),
        (Some(_), None) => Some(&matchup.ours.name),
        (None, Some(_)) => Some(&matchup.theirs.name),
        _ => None,
    };
    match winner {
        Some(name) => println!("  {} {name}", "Favoured:".bold()),
        None => println!("  {}", "Even match".bold()),
    }

    Ok(())
}

fn row(side: &Side, decimals: usize) -> Vec<String> {
    vec![
        side.name.clone(),
        format!("{:.1}", side.stats.weighted_ac),
        format!("{:.1}", side.stats.average_ac),
        side.stats.hit_points.to_string(),
        super::format_dpr(Some(side.stats.dpr), decimals),
        side.turns_to_victory
            .map(|t| format!("{t:.1}"))
            .unwrap_or_else(|| "never".to_string()),
    ]
}
