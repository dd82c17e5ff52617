use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(file: &Path, name: &str, json: bool) -> Result<(), String> {
    let bestiary = super::load_bestiary(file)?;
    let creature = bestiary.get(name).map_err(|e| e.to_string())?;
    let classification = creature.classification();

    if json {
        let out = serde_json::to_string_pretty(classification)
            .map_err(|e| format!("JSON serialization failed: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    println!("  {}", creature.name.bold());
    println!();
    match creature.multiattack_text() {
        Some(text) => println!("  multiattack: {text}"),
        None => println!("  multiattack: {}", "(none)".dimmed()),
    }
    println!(
        "  shape:       {} [{}]",
        classification.shape,
        super::marker(classification.confidence())
    );
    println!("  attacks:     {}", creature.catalog().len());

    match &classification.extraction {
        Some(extraction) => {
            if let Some(total) = extraction.total {
                println!("  total:       {total}");
            }
            println!();

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Count", "Attack", "Hit", "Damage", "Avg"]);
            for group in &extraction.groups {
                for (i, attack) in group.options.iter().enumerate() {
                    // choices share one count
                    let count = if i == 0 {
                        group.count.to_string()
                    } else {
                        "or".to_string()
                    };
                    table.add_row(vec![
                        count,
                        attack.name.clone(),
                        format!("{:+}", attack.hit_bonus),
                        attack.damage.to_string(),
                        format!("{:.1}", attack.average_damage()),
                    ]);
                }
            }
            println!("{table}");
        }
        None => {
            println!();
            println!("  {}", "DPR unknown: no extraction".yellow());
        }
    }

    if !classification.issues.is_empty() {
        println!();
        for issue in &classification.issues {
            let tag = if issue.is_error() {
                "ERROR".red().bold()
            } else {
                "WARN".yellow().bold()
            };
            println!("  {tag}  {issue}");
        }
    }

    Ok(())
}
