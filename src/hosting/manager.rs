//! Sidecar lifecycle management.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use url::Url;

use crate::hosting::config::{BackendMode, HostingConfig, HostingRole};
use crate::hosting::error::{HostingError, Result};
use crate::hosting::policy::{self, HostingDecision};
use crate::knowledge::{KnowledgeScanner, SubsystemIndex};

/// Manages the local sidecar process and selects the endpoint callers use.
///
/// At most one sidecar child process is owned at a time. All
/// lifecycle-mutating operations serialize on one internal lock, so two
/// overlapping [`ensure_hosting`](Self::ensure_hosting) calls can never
/// double-spawn. The manager performs its process and network calls inline
/// in the caller's task; nothing continues in the background except the
/// child-output log forwarders.
pub struct SidecarManager {
    state: Mutex<ManagerState>,
    scanner: KnowledgeScanner,
    /// Reusable HTTP client for health probes (avoids per-request allocation).
    http_client: reqwest::Client,
}

struct ManagerState {
    process: Option<Child>,
    last_knowledge: Vec<SubsystemIndex>,
}

impl SidecarManager {
    /// Create a new manager with no owned process.
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            state: Mutex::new(ManagerState {
                process: None,
                last_knowledge: Vec::new(),
            }),
            scanner: KnowledgeScanner::new(),
            http_client,
        }
    }

    /// Establish hosting for `role` and return the base URL to talk to.
    ///
    /// This is the main entry point. Depending on the policy decision it
    /// returns the dedicated server URL immediately, or ensures a local
    /// sidecar is running and healthy first. Within one call the order is
    /// fixed: spawn, then knowledge scan, then health probe, then endpoint
    /// selection.
    ///
    /// Spawn and scan failures are fatal and surface unmodified; a failed
    /// health probe is an expected startup condition and only steers the
    /// endpoint choice. When the local runtime stays unhealthy the result
    /// depends on the mode: `Local` fails with
    /// [`HostingError::RuntimeUnavailable`], anything else falls back to
    /// the dedicated server.
    pub async fn ensure_hosting(&self, role: HostingRole, config: &HostingConfig) -> Result<String> {
        let mut state = self.state.lock().await;

        config.validate()?;

        let decision = policy::decide(role, config);
        if decision == HostingDecision::DoNotHost || decision == HostingDecision::UseDedicatedServer
        {
            tracing::debug!(?decision, "routing to dedicated server");
            return Ok(config.dedicated_server_base_url.clone());
        }

        if config.auto_start_enabled && state.process.is_none() {
            state.process = Some(spawn_sidecar(config)?);
        }

        if config.knowledge_scan_enabled {
            state.last_knowledge = self.scanner.scan(config)?;
        }

        let healthy = self
            .is_healthy(&config.local_base_url, config.health_probe_timeout)
            .await;

        if healthy {
            tracing::info!(url = %config.local_base_url, "local sidecar healthy");
            return Ok(config.local_base_url.clone());
        }

        if config.backend_mode == BackendMode::Local {
            return Err(HostingError::RuntimeUnavailable {
                local_url: config.local_base_url.clone(),
                install_help_url: (!config.runtime_install_help_url.is_empty())
                    .then(|| config.runtime_install_help_url.clone()),
            });
        }

        tracing::info!(
            url = %config.dedicated_server_base_url,
            "local sidecar unhealthy, falling back to dedicated server"
        );
        Ok(config.dedicated_server_base_url.clone())
    }

    /// Probe `{base_url}/health` once under `deadline`.
    ///
    /// Healthy means the request completed with a non-error status. Every
    /// transport-level failure (connection refused, timeout, DNS) is an
    /// "unhealthy" verdict, not an error.
    pub async fn is_healthy(&self, base_url: &str, deadline: Duration) -> bool {
        let url = match Url::parse(base_url).and_then(|u| u.join("/health")) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("unprobeable base URL '{base_url}': {e}");
                return false;
            }
        };

        match self.http_client.get(url).timeout(deadline).send().await {
            Ok(response) => response.status().as_u16() < 400,
            Err(e) => {
                tracing::debug!("health probe failed: {e}");
                false
            }
        }
    }

    /// Snapshot of the knowledge indexes from the most recent scan.
    ///
    /// Performs no I/O; blocks only for the duration of a copy.
    pub async fn last_knowledge_indexes(&self) -> Vec<SubsystemIndex> {
        self.state.lock().await.last_knowledge.clone()
    }

    /// Terminate the owned sidecar process, if any.
    ///
    /// Idempotent and infallible; safe to call when nothing was started.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        if let Some(mut child) = state.process.take() {
            tracing::info!("stopping sidecar process");
            if let Err(e) = child.kill().await {
                tracing::debug!("sidecar process already gone: {e}");
            }
        }
    }
}

impl Default for SidecarManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the sidecar child process from the configured argv.
///
/// stdout and stderr are piped and forwarded line-wise to the `sidecar`
/// tracing target so the child's merged output stays available for
/// diagnostics. The child is killed if the handle is ever dropped without
/// an explicit stop.
fn spawn_sidecar(config: &HostingConfig) -> Result<Child> {
    let (program, args) = config
        .start_command
        .split_first()
        .ok_or_else(|| crate::error::ConfigError::MissingRequired {
            key: "start_command".to_string(),
        })?;

    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(&config.working_directory)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|source| HostingError::Spawn {
        command: config.start_command.join(" "),
        source,
    })?;

    tracing::info!(command = %config.start_command.join(" "), "spawned sidecar process");

    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::info!(target: "sidecar", "{line}");
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::warn!(target: "sidecar", "{line}");
            }
        });
    }

    Ok(child)
}
