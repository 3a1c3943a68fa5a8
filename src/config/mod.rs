//! Configuration module
//!
//! Handles search stages, confidence thresholds and preprocessing limits.

pub mod settings;

pub use settings::{ConfidenceThresholds, Settings, Stage, TierThresholds};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}
