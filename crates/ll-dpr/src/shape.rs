//! Multiattack shapes and their behavior table.
//!
//! A [`Shape`] is the structural pattern a multiattack description was
//! classified as. Each variant statically owns its combination [`Formula`]
//! and its [`Confidence`] marker; the text patterns and their order live in
//! [`crate::cascade`].

use serde::{Deserialize, Serialize};

/// How faithfully a shape's formula models the real combat routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// The formula captures the whole routine.
    Exact,
    /// A rider ability is ignored, so the real value is at least this.
    LowerBound,
    /// The routine was not understood; best single attack is used.
    Approximate,
}

impl Confidence {
    /// The marker printed between "DPR" and the value.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Exact => "=",
            Self::LowerBound => ">=",
            Self::Approximate => "~=",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How the groups of an extraction combine into one round of damage.
///
/// Every group contributes `count × best option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    /// All groups are used together in one round.
    Sum,
    /// Each group is a whole alternative routine; the best one is picked.
    Alternatives,
    /// The summed groups are repeated this many times.
    Repeat(u32),
}

/// Creature-specific phrasings that the generic rules misread.
///
/// These are compared against the whole multiattack text and win before
/// any templated rule is tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralOverride {
    /// Bite count depends on remaining heads; five is the starting count.
    Hydra,
    /// "one to constrict" has no "with its".
    Behir,
    /// Four distinct sub-attacks.
    PitFiend,
    /// Four distinct sub-attacks after a fear rider.
    Tarrasque,
}

/// The data an override stands for.
#[derive(Debug, Clone, Copy)]
pub struct LiteralSpec {
    /// Exact multiattack text this override replaces.
    pub text: &'static str,
    /// Stated total, if the text gives one.
    pub total: Option<&'static str>,
    /// `(count, attack name)` pairs.
    pub items: &'static [(&'static str, &'static str)],
    /// Confidence of the override.
    pub confidence: Confidence,
}

impl LiteralOverride {
    /// Every override, in the order they are checked.
    pub const ALL: [Self; 4] = [Self::Hydra, Self::Behir, Self::PitFiend, Self::Tarrasque];

    /// The literal text and extraction data for this override.
    pub fn spec(self) -> LiteralSpec {
        match self {
            Self::Hydra => LiteralSpec {
                text: "The hydra makes as many bite attacks as it has heads.",
                total: None,
                items: &[("five", "bite")],
                confidence: Confidence::Approximate,
            },
            Self::Behir => LiteralSpec {
                text: "The behir makes two attacks: one with its bite and one to constrict.",
                total: Some("two"),
                items: &[("one", "bite"), ("one", "constrict")],
                confidence: Confidence::Exact,
            },
            Self::PitFiend => LiteralSpec {
                text: "The pit fiend makes four attacks: one with its bite, one with its claw, \
                       one with its mace, and one with its tail.",
                total: Some("four"),
                items: &[
                    ("one", "bite"),
                    ("one", "claw"),
                    ("one", "mace"),
                    ("one", "tail"),
                ],
                confidence: Confidence::Exact,
            },
            Self::Tarrasque => LiteralSpec {
                text: "The tarrasque can use its Frightful Presence. It then makes five \
                       attacks: one with its bite, two with its claws, one with its horns, \
                       and one with its tail. It can use its Swallow instead of its bite.",
                total: Some("five"),
                items: &[
                    ("one", "bite"),
                    ("two", "claws"),
                    ("one", "horns"),
                    ("one", "tail"),
                ],
                confidence: Confidence::LowerBound,
            },
        }
    }

    /// Short name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hydra => "Hydra",
            Self::Behir => "Behir",
            Self::PitFiend => "PitFiend",
            Self::Tarrasque => "Tarrasque",
        }
    }
}

/// The classified structure of a multiattack description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// A creature-specific literal override.
    Literal(LiteralOverride),
    /// "makes a number of attacks equal to half this spell's level"
    ByHalfSpellLevel,
    /// "makes two attacks." (any attacks)
    Any,
    /// "makes two melee attacks."
    AnyMelee,
    /// "makes two ranged attacks."
    AnyRanged,
    /// "makes two melee attacks or two ranged attacks."
    MeleeOrRanged,
    /// "makes two scimitar attacks or two shortbow attacks."
    EitherOrCounts,
    /// "can use its Frightful Presence. It then makes three attacks: one
    /// with its bite and two with its claws."
    UsesThenNamedCounts,
    /// "makes three attacks: one with its bite and two with its claws or
    /// scimitar."
    TwoOfThreeChoice,
    /// "makes two attacks: one with its bite and one with its claws."
    TwoNamedCounts,
    /// "attacks twice, each time with its battleaxe and its morningstar."
    TwiceNamedPair,
    /// "makes two attacks with its greatsword and one with its shield."
    AttacksWithNamed,
    /// "makes one greataxe attack and one javelin attack."
    NamedPairAttacks,
    /// "makes two claw attacks and uses its Frightful Presence."
    NamedAndUses,
    /// "makes two attacks with its scimitar or its shortbow."
    WithNamedTwoOptions,
    /// "makes two attacks with its scimitar."
    WithNamed,
    /// "makes two claw attacks."
    Named,
    /// Catch-all for text no other rule matched.
    Default,
    /// The creature has no multiattack action.
    NoMultiattack,
}

impl Shape {
    /// Name of the shape for diagnostics and reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::Literal(o) => o.name(),
            Self::ByHalfSpellLevel => "ByHalfSpellLevel",
            Self::Any => "Any",
            Self::AnyMelee => "AnyMelee",
            Self::AnyRanged => "AnyRanged",
            Self::MeleeOrRanged => "MeleeOrRanged",
            Self::EitherOrCounts => "EitherOrCounts",
            Self::UsesThenNamedCounts => "UsesThenNamedCounts",
            Self::TwoOfThreeChoice => "TwoOfThreeChoice",
            Self::TwoNamedCounts => "TwoNamedCounts",
            Self::TwiceNamedPair => "TwiceNamedPair",
            Self::AttacksWithNamed => "AttacksWithNamed",
            Self::NamedPairAttacks => "NamedPairAttacks",
            Self::NamedAndUses => "NamedAndUses",
            Self::WithNamedTwoOptions => "WithNamedTwoOptions",
            Self::WithNamed => "WithNamed",
            Self::Named => "Named",
            Self::Default => "Default",
            Self::NoMultiattack => "NoMultiattack",
        }
    }

    /// How this shape's extraction combines into a round.
    pub fn formula(self) -> Formula {
        match self {
            Self::MeleeOrRanged | Self::EitherOrCounts => Formula::Alternatives,
            Self::TwiceNamedPair => Formula::Repeat(2),
            _ => Formula::Sum,
        }
    }

    /// Static confidence marker of this shape.
    pub fn confidence(self) -> Confidence {
        match self {
            Self::Literal(o) => o.spec().confidence,
            Self::UsesThenNamedCounts | Self::NamedAndUses => Confidence::LowerBound,
            Self::Default => Confidence::Approximate,
            _ => Confidence::Exact,
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(o) => write!(f, "Literal({})", o.name()),
            other => f.write_str(other.name()),
        }
    }
}
