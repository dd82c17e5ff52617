//! Creatures: stat-block input and the per-creature DPR surface.
//!
//! A [`Creature`] owns its action list. Its [`AttackCatalog`] and
//! [`Classification`] are derived on first use and memoized, so repeated
//! DPR queries over an AC sweep classify the multiattack text once.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::calc::DprResult;
use crate::cascade::{self, Classification};
use crate::catalog::AttackCatalog;
use crate::config::ReportConfig;
use crate::odds::RollMode;
use crate::shape::{Confidence, Shape};

/// Name of the action holding the multiattack description.
pub const MULTIATTACK: &str = "Multiattack";

/// One entry of a creature's action list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Action name, e.g. "Bite" or "Multiattack".
    pub name: String,
    /// Descriptive text; for attacks it starts with "Melee" or "Ranged".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Attack roll bonus.
    #[serde(default, alias = "attack_bonus", skip_serializing_if = "Option::is_none")]
    pub hit_bonus: Option<i32>,
    /// Damage expression such as "2d6+3".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
}

impl Action {
    /// A bare action with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
            hit_bonus: None,
            damage: None,
        }
    }

    /// A rollable attack.
    pub fn attack(
        name: impl Into<String>,
        text: impl Into<String>,
        hit_bonus: i32,
        damage: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            hit_bonus: Some(hit_bonus),
            damage: Some(damage.into()),
        }
    }

    /// The multiattack action with the given description.
    pub fn multiattack(text: impl Into<String>) -> Self {
        Self::new(MULTIATTACK).with_text(text)
    }

    /// Set the descriptive text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// A creature and its derived combat figures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Creature {
    /// Display name.
    pub name: String,
    /// Armor class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_class: Option<u32>,
    /// Average hit points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_points: Option<u32>,
    /// Actions in stat-block order.
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(skip)]
    catalog: OnceCell<AttackCatalog>,
    #[serde(skip)]
    classification: OnceCell<Classification>,
}

impl Creature {
    /// A creature with no stats and no actions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the armor class.
    pub fn with_armor_class(mut self, ac: u32) -> Self {
        self.armor_class = Some(ac);
        self
    }

    /// Set the hit points.
    pub fn with_hit_points(mut self, hp: u32) -> Self {
        self.hit_points = Some(hp);
        self
    }

    /// Append an action, discarding anything derived so far.
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self.catalog = OnceCell::new();
        self.classification = OnceCell::new();
        self
    }

    /// The rollable attacks of this creature.
    pub fn catalog(&self) -> &AttackCatalog {
        self.catalog.get_or_init(|| AttackCatalog::build(&self.actions))
    }

    /// Text of the action named "Multiattack", if any.
    pub fn multiattack_text(&self) -> Option<&str> {
        self.actions
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(MULTIATTACK))
            .and_then(|a| a.text.as_deref())
    }

    /// The classified multiattack routine.
    pub fn classification(&self) -> &Classification {
        self.classification.get_or_init(|| {
            let _span = tracing::debug_span!("classify", creature = %self.name).entered();
            cascade::classify(self.multiattack_text(), self.catalog())
        })
    }

    /// Shape of the multiattack routine.
    pub fn shape(&self) -> Shape {
        self.classification().shape
    }

    /// Confidence marker of the multiattack routine.
    pub fn confidence(&self) -> Confidence {
        self.classification().confidence()
    }

    /// Expected damage per round against `ac` with normal rolls.
    pub fn dpr(&self, ac: f64) -> Option<f64> {
        self.dpr_with(ac, RollMode::Normal)
    }

    /// Expected damage per round against `ac` under a roll mode.
    pub fn dpr_with(&self, ac: f64, mode: RollMode) -> Option<f64> {
        self.classification().dpr(ac, mode)
    }

    /// Expected damage per round tagged with its confidence.
    pub fn dpr_result(&self, ac: f64, mode: RollMode) -> DprResult {
        self.classification().dpr_result(ac, mode)
    }

    /// One-line DPR summary over the configured AC sweep.
    ///
    /// `DPR=16.6/11.7/6.8`, with the confidence marker in place of `=` and
    /// `??` for unknown values. A creature with no rollable attacks gives
    /// `DPR:??`.
    pub fn summary(&self, config: &ReportConfig) -> String {
        if self.catalog().is_empty() {
            return "DPR:??".to_string();
        }
        let values: Vec<String> = config
            .armor_classes
            .iter()
            .map(|&ac| match self.dpr_with(ac, config.roll_mode) {
                Some(v) => format!("{v:.prec$}", prec = config.decimals),
                None => "??".to_string(),
            })
            .collect();
        format!("DPR{}{}", self.confidence(), values.join("/"))
    }
}
