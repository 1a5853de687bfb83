//! Per-subsystem knowledge snapshots built from local mod content.
//!
//! The scanner walks configured content roots, indexes what it finds in
//! mod archives and loose config files, and fans the discovered entries
//! out into one index per configured subsystem objective. The hosting
//! manager triggers a scan before probing the local runtime and caches the
//! result; prompt builders read it back as an immutable snapshot.

pub mod scanner;

pub use scanner::{KnowledgeEntry, KnowledgeScanner, ScanError, SubsystemIndex};
