//! Core error types for the carousel engine
//!
//! Only configuration mistakes are errors. Redundant commands (already playing,
//! already on the target slide, busy animating, disabled engine) return `Ok`
//! without touching any state.

use thiserror::Error;

use super::options::Direction;

/// Result alias used throughout the crate
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// Core error types for the carousel engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(
        "Unknown transition type: {kind}{}",
        .direction.map(|d| format!(" (direction {d})")).unwrap_or_default()
    )]
    UnknownTransitionType {
        kind: String,
        direction: Option<Direction>,
    },

    #[error("Index out of range: {index} (slide count {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Config parse error: {source}")]
    ConfigParse {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl EngineError {
    /// Create a new unknown transition type error
    pub fn unknown_transition(kind: impl Into<String>, direction: Option<Direction>) -> Self {
        Self::UnknownTransitionType {
            kind: kind.into(),
            direction,
        }
    }

    /// Create a new index out of range error
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a new invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
