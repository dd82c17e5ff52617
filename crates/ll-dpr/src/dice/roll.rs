//! Rolling dice expressions.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{DiceExpr, Die, Term};

/// The result of rolling a single die.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DieResult {
    /// The type of die that was rolled.
    pub die: Die,
    /// The value rolled (1 to die.sides()).
    pub value: u32,
    /// True when the die belongs to a subtracted term.
    pub negative: bool,
}

/// The result of rolling an entire expression.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExprRoll {
    /// Individual die results, in expression order.
    pub dice: Vec<DieResult>,
    /// Sum of the flat modifiers.
    pub modifier: i64,
}

impl ExprRoll {
    /// Signed sum of all dice and modifiers.
    pub fn total(&self) -> i64 {
        let dice: i64 = self
            .dice
            .iter()
            .map(|d| {
                let v = i64::from(d.value);
                if d.negative { -v } else { v }
            })
            .sum();
        dice.saturating_add(self.modifier)
    }

    /// Number of dice rolled.
    pub fn count(&self) -> usize {
        self.dice.len()
    }
}

impl std::fmt::Display for ExprRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self
            .dice
            .iter()
            .map(|d| {
                if d.negative {
                    format!("-{}", d.value)
                } else {
                    d.value.to_string()
                }
            })
            .collect();
        match self.modifier {
            0 => write!(f, "[{}] = {}", values.join(", "), self.total()),
            m if m > 0 => write!(f, "[{}] +{m} = {}", values.join(", "), self.total()),
            m => write!(f, "[{}] {m} = {}", values.join(", "), self.total()),
        }
    }
}

impl DiceExpr {
    /// Roll every die in the expression using the given RNG.
    pub fn roll(&self, rng: &mut StdRng) -> ExprRoll {
        let mut result = ExprRoll::default();
        for term in &self.terms {
            match *term {
                Term::Dice {
                    count,
                    die,
                    negative,
                } => {
                    for _ in 0..count {
                        result.dice.push(DieResult {
                            die,
                            value: rng.random_range(1..=die.sides()),
                            negative,
                        });
                    }
                }
                Term::Flat(n) => result.modifier = result.modifier.saturating_add(n),
            }
        }
        result
    }
}
