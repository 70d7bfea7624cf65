//! Engine configuration
//!
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```json
//! {
//!   "auto_play": true,
//!   "rotation_speed_ms": 4000,
//!   "transition": { "type": "slide", "direction": "up", "speed_ms": 300 },
//!   "dimensions": { "width": 800, "height": 450 }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{EngineError, Result};
use super::options::TransitionOptions;

/// Size of the container the slides are shown in
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Start playing as soon as the engine is built
    pub auto_play: bool,
    /// How long each slide stays before autoplay moves on
    pub rotation_speed_ms: u64,
    /// Defaults for every transition
    pub transition: TransitionOptions,
    pub dimensions: Dimensions,
    /// Force-complete transitions left open longer than this
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_timeout_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_play: true,
            rotation_speed_ms: 4000,
            transition: TransitionOptions::default(),
            dimensions: Dimensions::default(),
            transition_timeout_ms: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn rotation_speed(&self) -> Duration {
        Duration::from_millis(self.rotation_speed_ms)
    }

    pub fn transition_timeout(&self) -> Option<Duration> {
        self.transition_timeout_ms.map(Duration::from_millis)
    }

    /// Check the values the type system cannot
    ///
    /// Strategy lookup is checked by the engine builder, which owns the registry.
    pub fn validate(&self) -> Result<()> {
        if self.rotation_speed_ms == 0 {
            return Err(EngineError::invalid_config(
                "rotation_speed_ms must be greater than zero",
            ));
        }
        if self.transition_timeout_ms == Some(0) {
            return Err(EngineError::invalid_config(
                "transition_timeout_ms must be greater than zero when set",
            ));
        }
        if self.dimensions.width < 0.0 || self.dimensions.height < 0.0 {
            return Err(EngineError::invalid_config(
                "dimensions must not be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::Direction;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.auto_play);
        assert_eq!(config.rotation_speed(), Duration::from_secs(4));
        assert_eq!(config.transition.kind, "fade");
        assert!(config.transition_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "rotation_speed_ms": 1500, "transition": { "type": "slide", "direction": "down" } }"#,
        )
        .unwrap();
        assert_eq!(config.rotation_speed_ms, 1500);
        assert_eq!(config.transition.kind, "slide");
        assert_eq!(config.transition.direction, Direction::Down);
        assert_eq!(config.transition.speed_ms, 500);
        assert!(config.auto_play);
    }

    #[test]
    fn test_zero_rotation_speed_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "rotation_speed_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = EngineConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EngineConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, EngineError::IoError { .. }));
    }
}
