//! Groups of creatures and their aggregate combat figures.

use serde::{Deserialize, Serialize};

use crate::creature::Creature;
use crate::error::{LoreError, LoreResult};
use crate::odds::RollMode;

/// AC assumed for a creature whose stat block gives none.
pub const UNARMORED_AC: u32 = 10;

/// Which group AC an opposing side attacks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcBasis {
    /// AC weighted by each member's hit points.
    #[default]
    Weighted,
    /// Plain mean of member ACs.
    Average,
}

/// Aggregate figures for a group against one target AC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    /// Summed DPR of every member with a known value.
    pub dpr: f64,
    /// Plain mean AC.
    pub average_ac: f64,
    /// Hit-point-weighted AC.
    pub weighted_ac: f64,
    /// Total hit points.
    pub hit_points: u32,
}

/// One side of a matchup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Side {
    /// Group name.
    pub name: String,
    /// This side's defensive and offensive figures.
    pub stats: CombatStats,
    /// Rounds this side needs to drop the opponent, `None` if it deals no
    /// damage.
    pub turns_to_victory: Option<f64>,
}

/// Both sides of a head-to-head comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    /// The group `vs` was called on.
    pub ours: Side,
    /// The opposing group.
    pub theirs: Side,
}

/// A named, non-empty group of creatures.
#[derive(Debug, Clone)]
pub struct Encounter {
    /// Group name used in reports.
    pub name: String,
    members: Vec<Creature>,
}

impl Encounter {
    /// Build a group. Fails if `members` is empty.
    pub fn new(name: impl Into<String>, members: Vec<Creature>) -> LoreResult<Self> {
        let name = name.into();
        if members.is_empty() {
            return Err(LoreError::EmptyGroup(name));
        }
        Ok(Self { name, members })
    }

    /// Members in the order given.
    pub fn members(&self) -> &[Creature] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; an encounter has at least one member.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Summed DPR against `ac`. Members with unknown DPR contribute nothing.
    pub fn dpr(&self, ac: f64, mode: RollMode) -> f64 {
        self.members
            .iter()
            .filter_map(|m| m.dpr_with(ac, mode))
            .sum()
    }

    /// Total hit points; members without hit points count as zero.
    pub fn total_hp(&self) -> u32 {
        self.members.iter().filter_map(|m| m.hit_points).sum()
    }

    /// Plain mean AC.
    pub fn average_ac(&self) -> f64 {
        let sum: f64 = self.members.iter().map(armor_class).sum();
        sum / self.members.len() as f64
    }

    /// Mean AC weighted by hit points. Falls back to the plain mean when no
    /// member has hit points.
    pub fn weighted_ac(&self) -> f64 {
        let total = self.total_hp();
        if total == 0 {
            return self.average_ac();
        }
        let weighted: f64 = self
            .members
            .iter()
            .map(|m| f64::from(m.hit_points.unwrap_or(0)) * armor_class(m))
            .sum();
        weighted / f64::from(total)
    }

    /// Aggregate figures against a target AC.
    pub fn combat_stats(&self, ac: f64, mode: RollMode) -> CombatStats {
        CombatStats {
            dpr: self.dpr(ac, mode),
            average_ac: self.average_ac(),
            weighted_ac: self.weighted_ac(),
            hit_points: self.total_hp(),
        }
    }

    fn defense(&self, basis: AcBasis) -> f64 {
        match basis {
            AcBasis::Weighted => self.weighted_ac(),
            AcBasis::Average => self.average_ac(),
        }
    }

    /// Pit this group against `opponents`.
    ///
    /// Each side attacks the other's AC under `basis`; turns to victory is
    /// the opponent's total hit points over this side's DPR.
    pub fn vs(&self, opponents: &Encounter, basis: AcBasis, mode: RollMode) -> Matchup {
        let ours = self.combat_stats(opponents.defense(basis), mode);
        let theirs = opponents.combat_stats(self.defense(basis), mode);
        tracing::debug!(
            ours = %self.name,
            theirs = %opponents.name,
            our_dpr = ours.dpr,
            their_dpr = theirs.dpr,
            "matchup"
        );
        Matchup {
            ours: Side {
                name: self.name.clone(),
                turns_to_victory: turns(theirs.hit_points, ours.dpr),
                stats: ours,
            },
            theirs: Side {
                name: opponents.name.clone(),
                turns_to_victory: turns(ours.hit_points, theirs.dpr),
                stats: theirs,
            },
        }
    }
}

fn armor_class(creature: &Creature) -> f64 {
    f64::from(creature.armor_class.unwrap_or(UNARMORED_AC))
}

fn turns(opponent_hp: u32, dpr: f64) -> Option<f64> {
    (dpr > 0.0).then(|| f64::from(opponent_hp) / dpr)
}
