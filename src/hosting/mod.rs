//! Sidecar hosting orchestration.
//!
//! Decides where the AI backend for a game process should live and turns
//! that decision into a live, reachable endpoint. A process can host the
//! backend itself (a local sidecar child process), defer to an already
//! running local sidecar, or be routed to a pre-configured dedicated server.
//!
//! The decision itself is a pure function ([`policy::decide`]); everything
//! stateful lives in [`SidecarManager`], which:
//! - Starts on first request (lazy initialization) when auto-start is on
//! - Owns at most one sidecar child process at a time
//! - Probes local health under a short deadline
//! - Falls back to the dedicated server when the local runtime is unusable
//! - Cleans up the child on [`SidecarManager::stop`] or drop
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                          SidecarManager                              │
//! │                                                                      │
//! │   ensure_hosting(role, config)                                       │
//! │         │                                                            │
//! │         ▼                                                            │
//! │   ┌──────────────┐   host locally   ┌───────────────────────────┐    │
//! │   │ policy::     │─────────────────▶│ Spawn child (if auto-start│    │
//! │   │ decide       │                  │ and none owned yet)       │    │
//! │   └──────────────┘                  └───────────────────────────┘    │
//! │         │ do not host /                       │                      │
//! │         │ use dedicated                       ▼                      │
//! │         │                   ┌──────────────┐   ┌──────────────────┐  │
//! │         │                   │ Knowledge    │──▶│ Probe /health    │  │
//! │         │                   │ scan (opt.)  │   │ (2 s deadline)   │  │
//! │         │                   └──────────────┘   └──────────────────┘  │
//! │         ▼                                             │              │
//! │   dedicated server URL          local URL ◀─ healthy ─┴─ unhealthy   │
//! │                                                            │         │
//! │                       LOCAL mode: RuntimeUnavailable ◀─────┤         │
//! │                       otherwise: dedicated server URL ◀────┘         │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use emberlink::hosting::{HostingConfig, HostingRole, SidecarManager};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = SidecarManager::new();
//! let config = HostingConfig {
//!     hosting_enabled: true,
//!     ..HostingConfig::default()
//! };
//!
//! let base_url = manager
//!     .ensure_hosting(HostingRole::Client, &config)
//!     .await?;
//! println!("AI backend available at: {base_url}");
//!
//! // Clean shutdown
//! manager.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod policy;

pub use config::{BackendMode, HostingConfig, HostingRole};
pub use error::{HostingError, Result};
pub use manager::SidecarManager;
pub use policy::{HostingDecision, decide};
