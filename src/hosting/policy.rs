//! Pure hosting placement policy.

use serde::{Deserialize, Serialize};

use crate::hosting::config::{BackendMode, HostingConfig, HostingRole};

/// Where the AI backend for a process should live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostingDecision {
    /// Hosting is disabled; route to the dedicated server.
    DoNotHost,
    /// Run (or reuse) the local sidecar runtime.
    HostLocally,
    /// Defer to the pre-configured dedicated server.
    UseDedicatedServer,
}

/// Compute host placement from role and configuration.
///
/// Evaluated in priority order, first match wins. `Local` and `Remote`
/// modes are hard operator overrides; in `Auto` mode with
/// `prefer_dedicated_server`, a dedicated server instance is itself the
/// preferred host and everything else defers to it.
pub fn decide(role: HostingRole, config: &HostingConfig) -> HostingDecision {
    if !config.hosting_enabled {
        return HostingDecision::DoNotHost;
    }

    match config.backend_mode {
        BackendMode::Local => HostingDecision::HostLocally,
        BackendMode::Remote => HostingDecision::UseDedicatedServer,
        BackendMode::Auto => {
            if config.prefer_dedicated_server {
                if role == HostingRole::DedicatedServer {
                    HostingDecision::HostLocally
                } else {
                    HostingDecision::UseDedicatedServer
                }
            } else {
                HostingDecision::HostLocally
            }
        }
    }
}
