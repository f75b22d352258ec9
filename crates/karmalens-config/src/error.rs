//! Error types for settings loading and validation.

use thiserror::Error;

/// Errors returned while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or blank.
    #[error("missing required environment variable: {0}")]
    MissingVar(String),
    /// A variable is present but its value cannot be used.
    #[error("invalid value for {name}: {message}")]
    InvalidVar { name: String, message: String },
}
