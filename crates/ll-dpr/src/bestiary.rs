//! Loading creatures from a JSON bestiary.
//!
//! ```json
//! {
//!   "report": { "armor_classes": [12, 16], "decimals": 2 },
//!   "creatures": [
//!     { "name": "Goblin", "armor_class": 15, "hit_points": 7,
//!       "actions": [ { "name": "Scimitar", "text": "Melee Weapon Attack",
//!                      "attack_bonus": 4, "damage": "1d6+2" } ] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::creature::Creature;
use crate::encounter::Encounter;
use crate::error::{LoreError, LoreResult};

/// A collection of creatures plus report settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bestiary {
    /// Report settings; defaults apply when the file has none.
    #[serde(default)]
    pub report: ReportConfig,
    /// Creatures in file order.
    #[serde(default)]
    pub creatures: Vec<Creature>,
}

impl Bestiary {
    /// Parse a bestiary from JSON text.
    pub fn from_json_str(json: &str) -> LoreResult<Self> {
        let bestiary: Self = serde_json::from_str(json)?;
        tracing::debug!(creatures = bestiary.creatures.len(), "loaded bestiary");
        Ok(bestiary)
    }

    /// Serialize back to pretty-printed JSON.
    pub fn to_json_string(&self) -> LoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Find a creature by case-insensitive name.
    pub fn get(&self, name: &str) -> LoreResult<&Creature> {
        let wanted = name.trim();
        self.creatures
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LoreError::UnknownCreature(wanted.to_string()))
    }

    /// Build a named group from creature names; repeated names add repeated
    /// members.
    pub fn encounter<S: AsRef<str>>(
        &self,
        group: impl Into<String>,
        names: &[S],
    ) -> LoreResult<Encounter> {
        let members = names
            .iter()
            .map(|n| self.get(n.as_ref()).cloned())
            .collect::<LoreResult<Vec<_>>>()?;
        Encounter::new(group, members)
    }

    /// Number of creatures.
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    /// True if the bestiary holds no creatures.
    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }
}
