//! Emberlink - hosting orchestrator and client SDK for a local AI companion
//! runtime ("sidecar") embedded alongside game processes.
//!
//! Game integrations call [`hosting::SidecarManager::ensure_hosting`] with
//! their role and a [`hosting::HostingConfig`] and get back a base URL they
//! can talk to. Depending on configuration the manager starts a local
//! sidecar process, reuses one it already owns, or routes the caller to a
//! pre-configured dedicated server - the caller never needs to know which.
//!
//! The crate also ships the two collaborators a complete integration needs:
//! [`knowledge`] builds per-subsystem knowledge snapshots from on-disk mod
//! content, and [`client`] is a thin typed HTTP client for the endpoint the
//! manager selected.

pub mod client;
pub mod config;
pub mod error;
pub mod hosting;
pub mod knowledge;

pub use client::{ClientError, GenerateReply, RuntimeClient};
pub use error::ConfigError;
pub use hosting::{
    BackendMode, HostingConfig, HostingDecision, HostingError, HostingRole, SidecarManager,
};
pub use knowledge::{KnowledgeEntry, KnowledgeScanner, ScanError, SubsystemIndex};
