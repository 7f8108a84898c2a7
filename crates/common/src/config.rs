use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Errors from loading an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Fixed-step simulation parameters.
///
/// Every client in a room must run with the same values, so the defaults are
/// the canonical ones and overrides are meant for local experiments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seconds of simulated time per step.
    pub time_step: f64,
    /// Entities are kept within `[-half_extent, half_extent]` on both axes.
    pub half_extent: f64,
    /// Edge length of the square collision footprint.
    pub footprint: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_step: 0.016,
            half_extent: 49.0,
            footprint: 2.0,
        }
    }
}

/// Session lifecycle parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Start commands within this many milliseconds of the last accepted one are ignored.
    pub debounce_ms: u64,
}

impl SessionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

/// Top-level configuration, loadable from JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sim: SimConfig,
    pub session: SessionConfig,
}

impl EngineConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sim.time_step.is_finite() || self.sim.time_step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "time_step must be positive, got {}",
                self.sim.time_step
            )));
        }
        if !self.sim.half_extent.is_finite() || self.sim.half_extent <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "half_extent must be positive, got {}",
                self.sim.half_extent
            )));
        }
        if !self.sim.footprint.is_finite() || self.sim.footprint < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "footprint must not be negative, got {}",
                self.sim.footprint
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_canonical() {
        let config = EngineConfig::default();
        assert_eq!(config.sim.time_step, 0.016);
        assert_eq!(config.sim.half_extent, 49.0);
        assert_eq!(config.sim.footprint, 2.0);
        assert_eq!(config.session.debounce(), Duration::from_millis(500));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "sim": { "time_step": 0.01 } }"#).unwrap();
        assert_eq!(config.sim.time_step, 0.01);
        assert_eq!(config.sim.half_extent, 49.0);
        assert_eq!(config.session.debounce_ms, 500);
    }

    #[test]
    fn rejects_non_positive_step() {
        let err = EngineConfig::from_json_str(r#"{ "sim": { "time_step": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
