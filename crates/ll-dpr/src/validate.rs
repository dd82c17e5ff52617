//! Turning captured text fragments into typed extractions.
//!
//! The cascade hands over raw strings: count words, attack-name fragments,
//! and attack categories. Validation converts the counts to integers,
//! resolves names against the [`AttackCatalog`], and checks stated totals.
//! Unresolvable names fail the extraction; a total that disagrees with the
//! counts is only reported, since published stat blocks contain such
//! mismatches.

use serde::{Deserialize, Serialize};

use crate::catalog::{Attack, AttackCatalog, AttackCategory};
use crate::shape::{Formula, Shape};

/// What a captured item refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTarget {
    /// One or more interchangeable attack names.
    Names(Vec<String>),
    /// Every attack of a category.
    Category(AttackCategory),
}

/// One captured `(count, target)` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    /// The count word, or `None` when the grammar implies one.
    pub count: Option<String>,
    /// What the count applies to.
    pub target: RawTarget,
}

impl RawItem {
    /// An item naming specific attacks.
    pub fn named(count: Option<&str>, names: &[&str]) -> Self {
        Self {
            count: count.map(str::to_string),
            target: RawTarget::Names(names.iter().map(|n| n.to_string()).collect()),
        }
    }

    /// An item drawing from a category of attacks.
    pub fn category(count: Option<&str>, category: AttackCategory) -> Self {
        Self {
            count: count.map(str::to_string),
            target: RawTarget::Category(category),
        }
    }
}

/// Everything a pattern captured, still as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCaptures {
    /// The stated total number of attacks, if any.
    pub total: Option<String>,
    /// Captured items in text order.
    pub items: Vec<RawItem>,
}

/// `count` uses of the best of `options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackGroup {
    /// How many times the attack is made.
    pub count: u32,
    /// Interchangeable attacks; one option makes this a plain pair.
    pub options: Vec<Attack>,
}

/// The typed result of a successful match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Groups in text order.
    pub groups: Vec<AttackGroup>,
    /// The stated total, if the text gave one.
    pub total: Option<u32>,
}

impl Extraction {
    /// Every `(count, attack)` pair, expanding choice groups.
    pub fn pairs(&self) -> impl Iterator<Item = (u32, &Attack)> {
        self.groups
            .iter()
            .flat_map(|g| g.options.iter().map(move |a| (g.count, a)))
    }

    /// Sum of the group counts.
    pub fn count_sum(&self) -> u32 {
        self.groups
            .iter()
            .fold(0, |acc: u32, g| acc.saturating_add(g.count))
    }
}

/// A problem found while validating captures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// A captured name matched no attack in the catalog.
    UnresolvedName {
        /// Shape being validated.
        shape: Shape,
        /// The fragment as captured.
        name: String,
    },
    /// A category had no attacks in it.
    EmptyCategory {
        /// Shape being validated.
        shape: Shape,
        /// The empty category.
        category: AttackCategory,
    },
    /// A count word was not a number.
    UnknownCount {
        /// Shape being validated.
        shape: Shape,
        /// The word as captured.
        word: String,
    },
    /// The counts do not add up to the stated total.
    InconsistentTotal {
        /// Shape being validated.
        shape: Shape,
        /// Total given by the text.
        stated: u32,
        /// Total the counts produce.
        counted: u32,
    },
    /// The routine depends on a spell level the creature does not know.
    SpellLevelUnknown,
}

impl Issue {
    /// Errors fail the extraction; the rest are data-quality warnings.
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::InconsistentTotal { .. })
    }

    /// Emit this issue as a log event.
    pub fn log(&self) {
        match self {
            Self::SpellLevelUnknown => tracing::debug!("{self}"),
            _ => tracing::warn!("{self}"),
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnresolvedName { shape, name } => {
                write!(f, "{shape}: no attack matches '{name}'")
            }
            Self::EmptyCategory { shape, category } => {
                write!(f, "{shape}: creature has no {category} attacks")
            }
            Self::UnknownCount { shape, word } => {
                write!(f, "{shape}: '{word}' is not a count")
            }
            Self::InconsistentTotal {
                shape,
                stated,
                counted,
            } => write!(
                f,
                "{shape}: text states {stated} attacks but the parts add up to {counted}"
            ),
            Self::SpellLevelUnknown => write!(f, "attack count depends on an unknown spell level"),
        }
    }
}

/// Largest count a multiattack can state; anything above is a typo.
pub const MAX_COUNT: u32 = 100;

/// Convert a count word ("two", "twice", "3") to an integer.
///
/// Digit counts above [`MAX_COUNT`] are rejected.
pub fn parse_count(word: &str) -> Option<u32> {
    let word = word.trim().to_ascii_lowercase();
    let n = match word.as_str() {
        "one" | "once" | "a" | "an" => 1,
        "two" | "twice" => 2,
        "three" | "thrice" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        digits => digits.parse().ok().filter(|&n| n <= MAX_COUNT)?,
    };
    Some(n)
}

/// Validate captures and log any issues found.
pub fn validate(shape: Shape, raw: &RawCaptures, catalog: &AttackCatalog) -> Option<Extraction> {
    let (extraction, issues) = check(shape, raw, catalog);
    for issue in &issues {
        issue.log();
    }
    extraction
}

/// Validate captures, returning the extraction (if any) and every issue
/// found, without logging.
pub fn check(
    shape: Shape,
    raw: &RawCaptures,
    catalog: &AttackCatalog,
) -> (Option<Extraction>, Vec<Issue>) {
    let mut issues = Vec::new();

    // No rollable attacks is a valid state, not a diagnostic.
    if catalog.is_empty() {
        return (None, issues);
    }
    if shape == Shape::ByHalfSpellLevel {
        issues.push(Issue::SpellLevelUnknown);
        return (None, issues);
    }

    let formula = shape.formula();
    let mut failed = false;
    let mut groups = Vec::with_capacity(raw.items.len());

    for item in &raw.items {
        let count = match item.count.as_deref() {
            None => 1,
            Some(word) => match parse_count(word) {
                Some(n) => n,
                None => {
                    issues.push(Issue::UnknownCount {
                        shape,
                        word: word.to_string(),
                    });
                    failed = true;
                    continue;
                }
            },
        };

        let options: Vec<Attack> = match &item.target {
            RawTarget::Names(names) => {
                let mut options = Vec::with_capacity(names.len());
                for name in names {
                    match catalog.resolve(name) {
                        Some(attack) => options.push(attack.clone()),
                        None => {
                            issues.push(Issue::UnresolvedName {
                                shape,
                                name: name.clone(),
                            });
                            failed = true;
                        }
                    }
                }
                options
            }
            RawTarget::Category(category) => {
                let options: Vec<Attack> =
                    catalog.category(*category).into_iter().cloned().collect();
                // An alternative routine the creature cannot perform is
                // simply not an option.
                if options.is_empty() && formula != Formula::Alternatives {
                    issues.push(Issue::EmptyCategory {
                        shape,
                        category: *category,
                    });
                    failed = true;
                }
                options
            }
        };

        if !options.is_empty() {
            groups.push(AttackGroup { count, options });
        }
    }

    let total = match raw.total.as_deref() {
        None => None,
        Some(word) => match parse_count(word) {
            Some(n) => Some(n),
            None => {
                issues.push(Issue::UnknownCount {
                    shape,
                    word: word.to_string(),
                });
                failed = true;
                None
            }
        },
    };

    if !failed && groups.is_empty() {
        for item in &raw.items {
            if let RawTarget::Category(category) = item.target {
                issues.push(Issue::EmptyCategory { shape, category });
            }
        }
        failed = true;
    }

    if failed {
        return (None, issues);
    }

    let extraction = Extraction { groups, total };
    let mismatch = total.and_then(|stated| {
        inconsistent_total(formula, &extraction, stated).map(|counted| (stated, counted))
    });
    if let Some((stated, counted)) = mismatch {
        issues.push(Issue::InconsistentTotal {
            shape,
            stated,
            counted,
        });
    }

    (Some(extraction), issues)
}

/// Returns the offending count when the extraction disagrees with `stated`.
fn inconsistent_total(formula: Formula, extraction: &Extraction, stated: u32) -> Option<u32> {
    match formula {
        Formula::Sum => Some(extraction.count_sum()),
        Formula::Repeat(n) => Some(n.saturating_mul(extraction.count_sum())),
        Formula::Alternatives => extraction
            .groups
            .iter()
            .map(|g| g.count)
            .find(|&c| c != stated)
            .or(Some(stated)),
    }
    .filter(|&counted| counted != stated)
}
