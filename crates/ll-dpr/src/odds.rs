//! d20 success probabilities.
//!
//! Attack rolls follow the "natural 1 always misses, natural 20 always hits"
//! rule, so their probability is clamped to `[0.05, 0.95]`. Plain checks and
//! saving throws have no automatic results and use [`meet_or_beat`].

use serde::{Deserialize, Serialize};

/// Lowest chance any attack roll can have (a natural 20).
pub const MIN_HIT: f64 = 0.05;
/// Highest chance any attack roll can have (a natural 1 still misses).
pub const MAX_HIT: f64 = 0.95;

/// How the d20 is rolled for an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollMode {
    /// One d20.
    #[default]
    Normal,
    /// Two d20s, keep the higher.
    Advantage,
    /// Two d20s, keep the lower.
    Disadvantage,
}

impl RollMode {
    /// Apply this roll mode to a single-die success probability.
    pub fn apply(self, p: f64) -> f64 {
        match self {
            Self::Normal => p,
            Self::Advantage => 1.0 - (1.0 - p) * (1.0 - p),
            Self::Disadvantage => p * p,
        }
    }
}

impl std::fmt::Display for RollMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Advantage => write!(f, "advantage"),
            Self::Disadvantage => write!(f, "disadvantage"),
        }
    }
}

impl std::str::FromStr for RollMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "adv" | "advantage" => Ok(Self::Advantage),
            "dis" | "disadvantage" => Ok(Self::Disadvantage),
            other => Err(format!("unknown roll mode: {other}")),
        }
    }
}

/// Chance that a d20 meets or beats `target` with no automatic results.
pub fn meet_or_beat(target: f64) -> f64 {
    ((21.0 - target) / 20.0).clamp(0.0, 1.0)
}

/// Chance that an attack roll needing `needed` on the die hits.
pub fn hit_probability(needed: f64) -> f64 {
    ((21.0 - needed) / 20.0).clamp(MIN_HIT, MAX_HIT)
}

/// Chance that an attack with `hit_bonus` hits a target with defense `ac`.
pub fn attack_odds(ac: f64, hit_bonus: i32, mode: RollMode) -> f64 {
    mode.apply(hit_probability(ac - f64::from(hit_bonus)))
}
