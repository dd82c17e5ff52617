pub mod classify;
pub mod dpr;
pub mod roll;
pub mod stats;
pub mod vs;

use std::fs;
use std::path::Path;

use colored::{ColoredString, Colorize};
use ll_dpr::{Bestiary, Confidence};

/// Read and parse a bestiary file.
fn load_bestiary(path: &Path) -> Result<Bestiary, String> {
    tracing::debug!(path = %path.display(), "reading bestiary");
    let json = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Bestiary::from_json_str(&json).map_err(|e| format!("{}: {e}", path.display()))
}

/// Confidence marker, coloured by how far it can be trusted.
fn marker(confidence: Confidence) -> ColoredString {
    let symbol = confidence.symbol();
    match confidence {
        Confidence::Exact => symbol.green(),
        Confidence::LowerBound => symbol.yellow(),
        Confidence::Approximate => symbol.red(),
    }
}

/// A DPR value with fixed decimals, or `??`.
fn format_dpr(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "??".to_string(),
    }
}

/// An AC for a column header: `15`, or `16.5` when fractional.
fn format_ac(ac: f64) -> String {
    if ac.fract() == 0.0 {
        format!("{ac:.0}")
    } else {
        format!("{ac}")
    }
}
