//! Configuration types for sidecar hosting.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{optional_bool_env, optional_env, parse_optional_env};
use crate::error::ConfigError;

/// Which kind of process is asking to be hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostingRole {
    /// A player-facing game client.
    Client,
    /// A dedicated game server instance.
    DedicatedServer,
}

/// Operator-configured routing preference for the AI backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    /// Probe the local runtime and fall back to the dedicated server.
    #[default]
    Auto,
    /// Require a healthy local runtime; never fall back.
    Local,
    /// Never attempt local hosting.
    Remote,
}

impl FromStr for BackendMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(ConfigError::InvalidValue {
                key: "backend_mode".to_string(),
                message: format!("must be 'auto', 'local' or 'remote', got '{other}'"),
            }),
        }
    }
}

impl std::fmt::Display for BackendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// Configuration snapshot for if/where AI backend hosting should run.
///
/// Constructed once per integration session and handed to the manager by
/// reference; the manager never mutates it.
#[derive(Debug, Clone)]
pub struct HostingConfig {
    /// Whether hosting is enabled at all.
    pub hosting_enabled: bool,
    /// Whether the manager may spawn the sidecar process itself.
    pub auto_start_enabled: bool,
    /// Routing preference.
    pub backend_mode: BackendMode,
    /// Base URL of the local sidecar runtime.
    pub local_base_url: String,
    /// In auto mode, prefer one dedicated host per deployment over
    /// per-client local runtimes.
    pub prefer_dedicated_server: bool,
    /// Base URL of the pre-configured dedicated server.
    pub dedicated_server_base_url: String,
    /// Setup-guide URL surfaced when the local runtime is mandated but
    /// unavailable. Empty means no guide is configured.
    pub runtime_install_help_url: String,
    /// Argv used to spawn the sidecar process.
    pub start_command: Vec<String>,
    /// Working directory for the spawned sidecar process.
    pub working_directory: PathBuf,
    /// Whether to build knowledge snapshots from local mod content.
    pub knowledge_scan_enabled: bool,
    /// Roots to walk for mod content.
    pub knowledge_scan_roots: Vec<PathBuf>,
    /// Subsystem name to objective description. Each subsystem gets its own
    /// knowledge index built from the same discovered entries.
    pub subsystem_objectives: BTreeMap<String, String>,
    /// Deadline for a single local health probe.
    pub health_probe_timeout: Duration,
    /// Cap on entries indexed from a single mod archive.
    pub max_entries_per_archive: usize,
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            hosting_enabled: false,
            auto_start_enabled: true,
            backend_mode: BackendMode::Auto,
            local_base_url: "http://127.0.0.1:8765".to_string(),
            prefer_dedicated_server: true,
            dedicated_server_base_url: "http://127.0.0.1:8765".to_string(),
            runtime_install_help_url: "https://ollama.com/download".to_string(),
            start_command: vec!["./scripts/run_sidecar_dev.sh".to_string()],
            working_directory: PathBuf::from("."),
            knowledge_scan_enabled: false,
            knowledge_scan_roots: vec![PathBuf::from("mods")],
            subsystem_objectives: BTreeMap::new(),
            health_probe_timeout: Duration::from_secs(2),
            max_entries_per_archive: 200,
        }
    }
}

impl HostingConfig {
    /// Resolve configuration from the environment, falling back to defaults.
    ///
    /// Subsystem objectives have no env representation; set them on the
    /// returned struct. The result is validated before it is returned.
    pub fn resolve() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            hosting_enabled: optional_bool_env("HOSTING_ENABLED", defaults.hosting_enabled)?,
            auto_start_enabled: optional_bool_env(
                "HOSTING_AUTO_START_ENABLED",
                defaults.auto_start_enabled,
            )?,
            backend_mode: optional_env("HOSTING_BACKEND_MODE")?
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or(defaults.backend_mode),
            local_base_url: optional_env("HOSTING_LOCAL_BASE_URL")?
                .unwrap_or(defaults.local_base_url),
            prefer_dedicated_server: optional_bool_env(
                "HOSTING_PREFER_DEDICATED_SERVER",
                defaults.prefer_dedicated_server,
            )?,
            dedicated_server_base_url: optional_env("HOSTING_DEDICATED_SERVER_BASE_URL")?
                .unwrap_or(defaults.dedicated_server_base_url),
            runtime_install_help_url: optional_env("HOSTING_RUNTIME_INSTALL_HELP_URL")?
                .unwrap_or(defaults.runtime_install_help_url),
            start_command: optional_env("HOSTING_START_COMMAND")?
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or(defaults.start_command),
            working_directory: optional_env("HOSTING_WORKING_DIRECTORY")?
                .map(PathBuf::from)
                .unwrap_or(defaults.working_directory),
            knowledge_scan_enabled: optional_bool_env(
                "KNOWLEDGE_SCAN_ENABLED",
                defaults.knowledge_scan_enabled,
            )?,
            knowledge_scan_roots: optional_env("KNOWLEDGE_SCAN_ROOTS")?
                .map(|s| s.split(',').map(PathBuf::from).collect())
                .unwrap_or(defaults.knowledge_scan_roots),
            subsystem_objectives: BTreeMap::new(),
            health_probe_timeout: Duration::from_millis(parse_optional_env(
                "HOSTING_HEALTH_PROBE_TIMEOUT_MS",
                defaults.health_probe_timeout.as_millis() as u64,
            )?),
            max_entries_per_archive: parse_optional_env(
                "KNOWLEDGE_MAX_ENTRIES_PER_ARCHIVE",
                defaults.max_entries_per_archive,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate required fields.
    ///
    /// Base URLs must parse; the start command must be non-empty when the
    /// manager is allowed to spawn the sidecar itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url("local_base_url", &self.local_base_url)?;
        validate_url("dedicated_server_base_url", &self.dedicated_server_base_url)?;

        if self.auto_start_enabled && self.start_command.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "start_command".to_string(),
            });
        }

        Ok(())
    }
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::MissingRequired {
            key: key.to_string(),
        });
    }

    Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("not a valid URL: {e}"),
    })?;

    Ok(())
}
