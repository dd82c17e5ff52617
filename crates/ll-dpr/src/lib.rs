//! Multiattack classification and damage-per-round estimates.
//!
//! Reads a creature's free-form multiattack description, classifies it
//! against a fixed cascade of phrasing patterns, resolves the attack names
//! it mentions against the creature's own attacks, and combines hit odds
//! and average damage into an expected damage per round (DPR) with a
//! confidence marker. Also aggregates DPR, AC and hit points over groups of
//! creatures for encounter comparisons.

pub mod bestiary;
pub mod calc;
pub mod cascade;
pub mod catalog;
pub mod config;
pub mod creature;
pub mod dice;
pub mod encounter;
pub mod error;
pub mod odds;
pub mod shape;
pub mod validate;

pub use bestiary::Bestiary;
pub use calc::DprResult;
pub use cascade::{Classification, classify};
pub use catalog::{Attack, AttackCatalog, AttackCategory, AttackKind};
pub use config::ReportConfig;
pub use creature::{Action, Creature};
pub use dice::{DiceExpr, Die, DieResult, ExprRoll};
pub use encounter::{AcBasis, CombatStats, Encounter, Matchup, Side};
pub use error::{LoreError, LoreResult};
pub use odds::RollMode;
pub use shape::{Confidence, Formula, LiteralOverride, Shape};
pub use validate::{AttackGroup, Extraction, Issue};
