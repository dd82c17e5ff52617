//! The attack catalog: every rollable attack a creature has.
//!
//! Built once per creature from its action list. Only actions carrying both
//! a hit bonus and a damage expression are kept. Lookups go through
//! [`AttackCatalog::resolve`], which applies a fixed two-step name policy
//! plus a small alias table. There is deliberately no fuzzy matching.

use serde::{Deserialize, Serialize};

use crate::creature::Action;
use crate::dice::DiceExpr;
use crate::odds::{self, RollMode};

/// Bumped whenever [`ALIASES`] changes, so cached classifications can be
/// invalidated by callers that persist them.
pub const ALIAS_TABLE_VERSION: u32 = 1;

/// Irregular plurals, typos, and rewordings seen in multiattack text,
/// mapped to the attack name they refer to. Keys are lowercase.
pub const ALIASES: &[(&str, &str)] = &[
    ("hooves", "hoof"),
    ("teeth", "bite"),
    ("fangs", "bite"),
    ("jaws", "bite"),
    ("knives", "knife"),
    ("feet", "stomp"),
    ("stinger", "sting"),
    ("long sword", "longsword"),
    ("short sword", "shortsword"),
    ("great sword", "greatsword"),
    ("morning star", "morningstar"),
    ("great club", "greatclub"),
    ("battle axe", "battleaxe"),
];

/// Possessives and articles that may precede an attack name.
const LEADING_ARTICLES: &[&str] = &["its ", "his ", "her ", "their ", "a ", "an ", "the "];

/// Whether an attack is made in melee, at range, or either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    /// Action text starts with "Melee".
    Melee,
    /// Action text starts with "Ranged".
    Ranged,
    /// Action text starts with "Melee or Ranged".
    MeleeOrRanged,
    /// No recognizable prefix.
    Unknown,
}

impl AttackKind {
    /// Classify an action by the prefix of its text.
    pub fn from_text(text: Option<&str>) -> Self {
        let Some(text) = text else {
            return Self::Unknown;
        };
        let lower = text.trim_start().to_ascii_lowercase();
        if lower.starts_with("melee or ranged") {
            Self::MeleeOrRanged
        } else if lower.starts_with("melee") {
            Self::Melee
        } else if lower.starts_with("ranged") {
            Self::Ranged
        } else {
            Self::Unknown
        }
    }

    /// True for melee and melee-or-ranged attacks.
    pub fn is_melee(self) -> bool {
        matches!(self, Self::Melee | Self::MeleeOrRanged)
    }

    /// True for ranged and melee-or-ranged attacks.
    pub fn is_ranged(self) -> bool {
        matches!(self, Self::Ranged | Self::MeleeOrRanged)
    }
}

/// One rollable attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    /// Name as printed in the stat block.
    pub name: String,
    /// Bonus added to the d20 attack roll.
    pub hit_bonus: i32,
    /// Damage dealt on a hit.
    pub damage: DiceExpr,
    /// Melee/ranged classification from the action text.
    pub kind: AttackKind,
}

impl Attack {
    /// Create an attack, parsing its damage expression.
    pub fn new(
        name: impl Into<String>,
        hit_bonus: i32,
        damage: &str,
        kind: AttackKind,
    ) -> crate::LoreResult<Self> {
        Ok(Self {
            name: name.into(),
            hit_bonus,
            damage: DiceExpr::parse(damage)?,
            kind,
        })
    }

    /// Average damage on a hit. A hit never heals, so penalties that push
    /// the dice average below zero count as zero.
    pub fn average_damage(&self) -> f64 {
        self.damage.average().max(0.0)
    }

    /// Expected damage of one swing against `ac`.
    pub fn expected_damage(&self, ac: f64, mode: RollMode) -> f64 {
        odds::attack_odds(ac, self.hit_bonus, mode) * self.average_damage()
    }
}

/// Which slice of the catalog an "any N attacks" phrase draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackCategory {
    /// Every attack.
    Any,
    /// Melee attacks only.
    Melee,
    /// Ranged attacks only.
    Ranged,
}

impl std::fmt::Display for AttackCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Melee => write!(f, "melee"),
            Self::Ranged => write!(f, "ranged"),
        }
    }
}

/// The set of rollable attacks available to one creature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackCatalog {
    attacks: Vec<Attack>,
}

impl AttackCatalog {
    /// Build the catalog from a creature's full action list.
    ///
    /// Actions without a hit bonus or damage are skipped silently; actions
    /// whose damage does not parse are skipped with a warning.
    pub fn build(actions: &[Action]) -> Self {
        let attacks = actions
            .iter()
            .filter_map(|action| {
                let hit_bonus = action.hit_bonus?;
                let damage = action.damage.as_deref()?;
                match DiceExpr::parse(damage) {
                    Ok(damage) => Some(Attack {
                        name: action.name.clone(),
                        hit_bonus,
                        damage,
                        kind: AttackKind::from_text(action.text.as_deref()),
                    }),
                    Err(e) => {
                        tracing::warn!(action = %action.name, "dropping attack: {e}");
                        None
                    }
                }
            })
            .collect();
        Self { attacks }
    }

    /// Build a catalog from already-constructed attacks.
    pub fn from_attacks(attacks: Vec<Attack>) -> Self {
        Self { attacks }
    }

    /// Number of attacks.
    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    /// True if the creature has no rollable attacks.
    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }

    /// All attacks, in action-list order.
    pub fn iter(&self) -> impl Iterator<Item = &Attack> {
        self.attacks.iter()
    }

    /// Attacks belonging to a category.
    pub fn category(&self, category: AttackCategory) -> Vec<&Attack> {
        self.attacks
            .iter()
            .filter(|a| match category {
                AttackCategory::Any => true,
                AttackCategory::Melee => a.kind.is_melee(),
                AttackCategory::Ranged => a.kind.is_ranged(),
            })
            .collect()
    }

    /// Melee attacks.
    pub fn melee(&self) -> Vec<&Attack> {
        self.category(AttackCategory::Melee)
    }

    /// Ranged attacks.
    pub fn ranged(&self) -> Vec<&Attack> {
        self.category(AttackCategory::Ranged)
    }

    /// Resolve a name fragment captured from multiattack text.
    ///
    /// Tries, in order: case-insensitive exact match, match with a trailing
    /// "s" stripped from both sides, then the alias table followed by the
    /// same two steps.
    pub fn resolve(&self, fragment: &str) -> Option<&Attack> {
        let key = normalize(fragment);
        if key.is_empty() {
            return None;
        }
        self.lookup(&key).or_else(|| {
            ALIASES
                .iter()
                .find(|(from, _)| *from == key)
                .and_then(|(_, to)| self.lookup(to))
        })
    }

    fn lookup(&self, key: &str) -> Option<&Attack> {
        self.attacks
            .iter()
            .find(|a| a.name.to_lowercase() == key)
            .or_else(|| {
                let singular = strip_plural(key);
                self.attacks
                    .iter()
                    .find(|a| strip_plural(&a.name.to_lowercase()) == singular)
            })
    }
}

fn normalize(fragment: &str) -> String {
    let mut key = fragment.trim().to_lowercase();
    while let Some(rest) = LEADING_ARTICLES
        .iter()
        .find_map(|article| key.strip_prefix(article))
    {
        key = rest.trim_start().to_string();
    }
    key
}

fn strip_plural(name: &str) -> &str {
    name.strip_suffix('s').unwrap_or(name)
}

impl<'a> IntoIterator for &'a AttackCatalog {
    type Item = &'a Attack;
    type IntoIter = std::slice::Iter<'a, Attack>;

    fn into_iter(self) -> Self::IntoIter {
        self.attacks.iter()
    }
}
