use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use ll_dpr::{Creature, RollMode};

pub fn run(
    file: &Path,
    names: &[String],
    armor_classes: Vec<f64>,
    decimals: Option<usize>,
    mode: Option<RollMode>,
) -> Result<(), String> {
    let bestiary = super::load_bestiary(file)?;

    let mut config = bestiary.report.clone().with_armor_classes(armor_classes);
    if let Some(decimals) = decimals {
        config = config.with_decimals(decimals);
    }
    if let Some(mode) = mode {
        config = config.with_roll_mode(mode);
    }

    let creatures: Vec<&Creature> = if names.is_empty() {
        bestiary.creatures.iter().collect()
    } else {
        names
            .iter()
            .map(|n| bestiary.get(n).map_err(|e| e.to_string()))
            .collect::<Result<_, _>>()?
    };

    if creatures.is_empty() {
        println!("  No creatures found.");
        return Ok(());
    }

    let mut header = vec!["Name".to_string(), "Shape".to_string(), String::new()];
    header.extend(
        config
            .armor_classes
            .iter()
            .map(|&ac| format!("AC {}", super::format_ac(ac))),
    );

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);

    for creature in &creatures {
        let mut row = vec![
            creature.name.clone(),
            creature.shape().to_string(),
            super::marker(creature.confidence()).to_string(),
        ];
        row.extend(config.armor_classes.iter().map(|&ac| {
            super::format_dpr(creature.dpr_with(ac, config.roll_mode), config.decimals)
        }));
        table.add_row(row);
    }

    println!("{table}");
    println!();
    if config.roll_mode != RollMode::Normal {
        println!("  {} rolls", config.roll_mode);
    }
    for creature in &creatures {
        println!("  {}: {}", creature.name, creature.summary(&config));
    }

    Ok(())
}
