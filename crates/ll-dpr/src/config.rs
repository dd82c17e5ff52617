//! Configuration for DPR reports.

use serde::{Deserialize, Serialize};

use crate::odds::RollMode;

/// How creature and group DPR figures are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Target ACs a summary sweeps over, in display order.
    pub armor_classes: Vec<f64>,
    /// Decimal places shown for DPR values.
    pub decimals: usize,
    /// Attack-roll model used for every figure.
    pub roll_mode: RollMode,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            armor_classes: vec![10.0, 15.0, 20.0],
            decimals: 1,
            roll_mode: RollMode::Normal,
        }
    }
}

impl ReportConfig {
    /// Set the AC sweep. An empty sweep keeps the current one.
    pub fn with_armor_classes(mut self, armor_classes: Vec<f64>) -> Self {
        if !armor_classes.is_empty() {
            self.armor_classes = armor_classes;
        }
        self
    }

    /// Set the number of decimal places (at most 4).
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals.min(4);
        self
    }

    /// Set the attack-roll model.
    pub fn with_roll_mode(mut self, roll_mode: RollMode) -> Self {
        self.roll_mode = roll_mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = ReportConfig::default();
        assert_eq!(cfg.armor_classes, vec![10.0, 15.0, 20.0]);
        assert_eq!(cfg.decimals, 1);
        assert_eq!(cfg.roll_mode, RollMode::Normal);
    }

    #[test]
    fn builder_methods() {
        let cfg = ReportConfig::default()
            .with_armor_classes(vec![12.0, 16.5])
            .with_decimals(2)
            .with_roll_mode(RollMode::Advantage);
        assert_eq!(cfg.armor_classes, vec![12.0, 16.5]);
        assert_eq!(cfg.decimals, 2);
        assert_eq!(cfg.roll_mode, RollMode::Advantage);
    }

    #[test]
    fn empty_sweep_is_ignored() {
        let cfg = ReportConfig::default().with_armor_classes(Vec::new());
        assert_eq!(cfg.armor_classes.len(), 3);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: ReportConfig = serde_json::from_str(r#"{"decimals": 2}"#).unwrap();
        assert_eq!(cfg.decimals, 2);
        assert_eq!(cfg.armor_classes, vec![10.0, 15.0, 20.0]);
    }
}
