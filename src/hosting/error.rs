//! Error types for sidecar hosting.

use thiserror::Error;

use crate::error::ConfigError;
use crate::knowledge::ScanError;

/// Result type for hosting operations.
pub type Result<T> = std::result::Result<T, HostingError>;

/// Errors that can occur while establishing hosting.
///
/// Health-probe transport failures are deliberately absent: they are
/// absorbed into an "unhealthy" verdict and steer endpoint selection
/// instead of surfacing.
#[derive(Debug, Error)]
pub enum HostingError {
    /// Configuration was missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The sidecar process could not be spawned.
    #[error("Failed to spawn sidecar process '{command}': {source}")]
    Spawn {
        /// The argv that was attempted, joined for display.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The knowledge scan failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Local hosting was mandated but the local runtime never became
    /// healthy. Carries the remediation data as fields so callers can
    /// localize or reformat the message.
    #[error(
        "Local AI runtime is required but unavailable at {local_url}. \
         Install or start the companion runtime, then retry.{}",
        .install_help_url.as_deref().map(|u| format!(" Setup guide: {u}")).unwrap_or_default()
    )]
    RuntimeUnavailable {
        /// The local base URL that never answered health.
        local_url: String,
        /// Setup-guide URL, when one is configured.
        install_help_url: Option<String>,
    },
}
