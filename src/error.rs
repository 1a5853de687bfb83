//! Crate-level configuration error type.

use thiserror::Error;

/// Errors raised while resolving or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable or config field holds an unusable value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// Variable or field name.
        key: String,
        /// What was wrong with it.
        message: String,
    },

    /// A required field is missing or empty.
    #[error("Missing required config value: {key}")]
    MissingRequired {
        /// Variable or field name.
        key: String,
    },

    /// An environment variable exists but is not valid unicode.
    #[error("Environment variable {key} is not valid unicode")]
    NotUnicode {
        /// Variable name.
        key: String,
    },
}
