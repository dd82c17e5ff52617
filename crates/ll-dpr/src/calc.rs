//! The DPR calculator: combining expected damage per shape.

use serde::{Deserialize, Serialize};

use crate::catalog::Attack;
use crate::odds::RollMode;
use crate::shape::{Confidence, Formula, Shape};
use crate::validate::{AttackGroup, Extraction};

/// A DPR estimate tagged with how much it can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DprResult {
    /// Expected damage per round, or `None` when unknown.
    pub value: Option<f64>,
    /// Static confidence of the shape the value came from.
    pub confidence: Confidence,
}

impl std::fmt::Display for DprResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let precision = f.precision().unwrap_or(1);
        match self.value {
            Some(v) => write!(f, "{}{v:.precision$}", self.confidence),
            None => write!(f, "??"),
        }
    }
}

/// Expected damage of one use of the best option in `options`.
pub fn best_expected(options: &[Attack], ac: f64, mode: RollMode) -> Option<f64> {
    options
        .iter()
        .map(|a| a.expected_damage(ac, mode))
        .max_by(f64::total_cmp)
}

/// Expected damage of a whole group: `count × best option`.
pub fn group_expected(group: &AttackGroup, ac: f64, mode: RollMode) -> Option<f64> {
    best_expected(&group.options, ac, mode).map(|best| f64::from(group.count) * best)
}

/// Combine an extraction into one round of damage using `formula`.
///
/// Returns `None` for an extraction with no groups.
pub fn combine(formula: Formula, extraction: &Extraction, ac: f64, mode: RollMode) -> Option<f64> {
    let mut values = extraction
        .groups
        .iter()
        .filter_map(|g| group_expected(g, ac, mode))
        .peekable();
    values.peek()?;

    match formula {
        Formula::Sum => Some(values.sum()),
        Formula::Alternatives => values.max_by(f64::total_cmp),
        Formula::Repeat(n) => Some(f64::from(n) * values.sum::<f64>()),
    }
}

/// Expected damage per round for a classified routine.
///
/// `None` when there is no extraction (validation failed or the creature
/// has no usable attacks).
pub fn dpr(shape: Shape, extraction: Option<&Extraction>, ac: f64, mode: RollMode) -> Option<f64> {
    combine(shape.formula(), extraction?, ac, mode)
}
