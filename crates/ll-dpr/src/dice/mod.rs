//! Dice expressions: parsing, averaging, and rolling.
//!
//! Damage formulas are written in standard notation, e.g. `1d8+3` or
//! `2d10+10 + 2d6`. An expression is a signed sum of dice terms (`NdM`)
//! and flat modifiers. Averages are exact; nothing is rounded until the
//! caller formats the result.

pub mod roll;

pub use roll::{DieResult, ExprRoll};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LoreError, LoreResult};

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// Build a die from its side count. A one-sided "die" is allowed since
    /// some stat blocks write flat damage as `1d1`.
    pub fn from_sides(sides: u32) -> Option<Self> {
        match sides {
            0 => None,
            4 => Some(Self::D4),
            6 => Some(Self::D6),
            8 => Some(Self::D8),
            10 => Some(Self::D10),
            12 => Some(Self::D12),
            20 => Some(Self::D20),
            100 => Some(Self::D100),
            n => Some(Self::Custom(n)),
        }
    }

    /// Average face value of a single roll.
    pub fn average(self) -> f64 {
        (f64::from(self.sides()) + 1.0) / 2.0
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// One signed term of a dice expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    /// `count` dice of one type, added or subtracted.
    Dice {
        /// How many dice are rolled.
        count: u32,
        /// Which die.
        die: Die,
        /// True when the term is subtracted.
        negative: bool,
    },
    /// A flat modifier (already signed).
    Flat(i64),
}

impl Term {
    /// Expected value of this term.
    pub fn average(&self) -> f64 {
        match *self {
            Self::Dice {
                count,
                die,
                negative,
            } => {
                let avg = f64::from(count) * die.average();
                if negative { -avg } else { avg }
            }
            Self::Flat(n) => n as f64,
        }
    }
}

/// Most dice a single expression may roll.
pub const MAX_DICE: u32 = 1000;

/// A parsed dice expression such as `2d6+3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpr {
    /// The terms of the expression, in source order.
    pub terms: Vec<Term>,
}

impl DiceExpr {
    /// Parse an expression made of `NdM` and integer terms joined by `+`
    /// or `-`. Whitespace is ignored. `d20` is read as `1d20`. Expressions
    /// rolling more than [`MAX_DICE`] dice are rejected.
    pub fn parse(input: &str) -> LoreResult<Self> {
        let invalid = |reason: &str| LoreError::InvalidDice {
            expr: input.to_string(),
            reason: reason.to_string(),
        };

        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(invalid("empty expression"));
        }

        let mut terms = Vec::new();
        let mut dice: u32 = 0;
        let mut negative = false;
        let mut current = String::new();

        for ch in compact.chars().chain(std::iter::once('+')) {
            if ch == '+' || ch == '-' {
                if current.is_empty() {
                    // a leading sign, or a doubled operator
                    if !terms.is_empty() || negative {
                        return Err(invalid("dangling operator"));
                    }
                    negative = ch == '-';
                    continue;
                }
                let term = parse_term(&current, negative)
                    .ok_or_else(|| invalid(&format!("bad term '{current}'")))?;
                if let Term::Dice { count, .. } = term {
                    dice = dice.saturating_add(count);
                    if dice > MAX_DICE {
                        return Err(invalid(&format!("more than {MAX_DICE} dice")));
                    }
                }
                terms.push(term);
                current.clear();
                negative = ch == '-';
            } else {
                current.push(ch);
            }
        }

        Ok(Self { terms })
    }

    /// Expected total of the expression.
    pub fn average(&self) -> f64 {
        self.terms.iter().map(Term::average).sum()
    }

    /// Smallest possible total (every die shows 1).
    pub fn min(&self) -> i64 {
        self.extreme(false)
    }

    /// Largest possible total (every die shows its highest face).
    pub fn max(&self) -> i64 {
        self.extreme(true)
    }

    /// Total when every added die shows `high` faces and every subtracted
    /// die the opposite. Saturates instead of overflowing.
    fn extreme(&self, high: bool) -> i64 {
        self.terms.iter().fold(0i64, |acc, t| {
            let value = match *t {
                Term::Dice {
                    count,
                    die,
                    negative,
                } => {
                    let face = if high != negative {
                        i64::from(die.sides())
                    } else {
                        1
                    };
                    signed(i64::from(count).saturating_mul(face), negative)
                }
                Term::Flat(n) => n,
            };
            acc.saturating_add(value)
        })
    }
}

fn signed(value: i64, negative: bool) -> i64 {
    if negative { -value } else { value }
}

/// Parse a single unsigned term: `NdM`, `dM`, or an integer.
fn parse_term(term: &str, negative: bool) -> Option<Term> {
    let lower = term.to_ascii_lowercase();
    match lower.split_once('d') {
        Some((count, sides)) => {
            let count = if count.is_empty() {
                1
            } else {
                count.parse::<u32>().ok()?
            };
            let die = Die::from_sides(sides.parse::<u32>().ok()?)?;
            Some(Term::Dice {
                count,
                die,
                negative,
            })
        }
        None => {
            let n = lower.parse::<i64>().ok()?;
            Some(Term::Flat(signed(n, negative)))
        }
    }
}

impl FromStr for DiceExpr {
    type Err = LoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            let (negative, body) = match *term {
                Term::Dice {
                    count,
                    die,
                    negative,
                } => (negative, format!("{count}{die}")),
                Term::Flat(n) => (n < 0, n.unsigned_abs().to_string()),
            };
            if negative {
                write!(f, "-")?;
            } else if i > 0 {
                write!(f, "+")?;
            }
            write!(f, "{body}")?;
        }
        Ok(())
    }
}

/// Average of a dice expression string, or `None` if it does not parse.
pub fn average(expr: &str) -> Option<f64> {
    DiceExpr::parse(expr).ok().map(|e| e.average())
}
