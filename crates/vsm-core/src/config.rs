//! Construction-time settings for a recipe process.

use serde::{Deserialize, Serialize};

/// Upper bound on the efficiency/quality percentage.
pub const MAX_EFFICIENCY: f64 = 1000.0;

/// Configuration errors, raised when a process is built rather than on first use.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("base duration must be finite and positive, got {0}")]
    NonPositiveDuration(f64),
    #[error("duration variability must be finite and non-negative, got {0}")]
    NegativeVariability(f64),
    #[error("efficiency must be within [0, 1000], got {0}")]
    EfficiencyOutOfRange(f64),
}

/// Timing and yield parameters of a recipe process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeProcessConfig {
    /// Mean time of one craft.
    pub base_duration: f64,
    /// Standard deviation of the craft time.
    #[serde(default)]
    pub duration_variability: f64,
    /// Percentage applied to every output quantity before flooring.
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,
    /// Seed for the duration noise.
    #[serde(default)]
    pub seed: u64,
}

fn default_efficiency() -> f64 {
    100.0
}

impl RecipeProcessConfig {
    /// Deterministic timing with full efficiency.
    pub fn new(base_duration: f64) -> Self {
        Self {
            base_duration,
            duration_variability: 0.0,
            efficiency: default_efficiency(),
            seed: 0,
        }
    }

    pub fn with_variability(mut self, stddev: f64) -> Self {
        self.duration_variability = stddev;
        self
    }

    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_duration.is_finite() || self.base_duration <= 0.0 {
            return Err(ConfigError::NonPositiveDuration(self.base_duration));
        }
        if !self.duration_variability.is_finite() || self.duration_variability < 0.0 {
            return Err(ConfigError::NegativeVariability(self.duration_variability));
        }
        if !(0.0..=MAX_EFFICIENCY).contains(&self.efficiency) {
            return Err(ConfigError::EfficiencyOutOfRange(self.efficiency));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = RecipeProcessConfig::new(10.0);
        assert_eq!(cfg.efficiency, 100.0);
        assert_eq!(cfg.duration_variability, 0.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_duration() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let cfg = RecipeProcessConfig::new(bad);
            assert!(matches!(
                cfg.validate(),
                Err(ConfigError::NonPositiveDuration(_))
            ));
        }
    }

    #[test]
    fn rejects_negative_variability() {
        let cfg = RecipeProcessConfig::new(5.0).with_variability(-0.1);
        assert_eq!(cfg.validate(), Err(ConfigError::NegativeVariability(-0.1)));
        let cfg = RecipeProcessConfig::new(5.0).with_variability(f64::NAN);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_efficiency_out_of_range() {
        let cfg = RecipeProcessConfig::new(5.0).with_efficiency(-1.0);
        assert_eq!(cfg.validate(), Err(ConfigError::EfficiencyOutOfRange(-1.0)));
        let cfg = RecipeProcessConfig::new(5.0).with_efficiency(MAX_EFFICIENCY + 1.0);
        assert!(cfg.validate().is_err());
        let cfg = RecipeProcessConfig::new(5.0).with_efficiency(f64::NAN);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn boundary_efficiencies_accepted() {
        assert!(RecipeProcessConfig::new(1.0).with_efficiency(0.0).validate().is_ok());
        assert!(
            RecipeProcessConfig::new(1.0)
                .with_efficiency(MAX_EFFICIENCY)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn deserializes_with_defaults() {
        let cfg: RecipeProcessConfig =
            serde_json::from_str(r#"{"base_duration": 12.0}"#).unwrap();
        assert_eq!(cfg, RecipeProcessConfig::new(12.0));
    }
}
