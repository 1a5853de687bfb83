//! Mod content scanning.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zip::ZipArchive;

use crate::hosting::HostingConfig;

/// Errors that can occur during a knowledge scan.
///
/// A scan is all-or-nothing: the first error aborts it and no partial
/// result is kept.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Filesystem error while walking a root or reading a file.
    #[error("I/O error while scanning {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// A mod archive could not be read.
    #[error("Unreadable mod archive {path}: {reason}")]
    Archive {
        /// Archive path.
        path: PathBuf,
        /// Why it could not be read.
        reason: String,
    },
}

/// Single discovered fact about local mod content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// File the fact came from.
    pub source: String,
    /// What was found there.
    pub detail: String,
}

/// Knowledge snapshot for one subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsystemIndex {
    /// Subsystem name.
    pub subsystem: String,
    /// What this subsystem is trying to achieve with the knowledge.
    pub objective: String,
    /// Discovered entries, in walk order.
    pub entries: Vec<KnowledgeEntry>,
}

/// Scans mod roots and builds per-subsystem knowledge indexes.
#[derive(Debug, Default)]
pub struct KnowledgeScanner;

impl KnowledgeScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Walk the configured roots and build one index per subsystem
    /// objective.
    ///
    /// Returns an empty list when scanning is disabled or nothing was
    /// discovered. With no objectives configured, everything lands in a
    /// single `default` index.
    pub fn scan(&self, config: &HostingConfig) -> Result<Vec<SubsystemIndex>, ScanError> {
        if !config.knowledge_scan_enabled {
            return Ok(Vec::new());
        }

        let entries = discover_entries(
            &config.knowledge_scan_roots,
            config.max_entries_per_archive,
        )?;
        tracing::debug!(count = entries.len(), "knowledge scan discovered entries");

        if entries.is_empty() {
            return Ok(Vec::new());
        }

        if config.subsystem_objectives.is_empty() {
            return Ok(vec![SubsystemIndex {
                subsystem: "default".to_string(),
                objective: "General mod content context".to_string(),
                entries,
            }]);
        }

        Ok(config
            .subsystem_objectives
            .iter()
            .map(|(subsystem, objective)| SubsystemIndex {
                subsystem: subsystem.clone(),
                objective: objective.clone(),
                entries: entries.clone(),
            })
            .collect())
    }
}

fn discover_entries(
    roots: &[PathBuf],
    max_entries_per_archive: usize,
) -> Result<Vec<KnowledgeEntry>, ScanError> {
    let mut entries = Vec::new();

    for root in roots {
        if !root.exists() {
            continue;
        }

        let mut files = Vec::new();
        collect_files(root, &mut files)?;
        files.sort();

        for file in files {
            let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if name.ends_with(".jar") || name.ends_with(".zip") {
                scan_archive(&file, max_entries_per_archive, &mut entries)?;
            } else if name.ends_with(".toml") || name.ends_with(".json") || name.ends_with(".mcmeta")
            {
                entries.push(KnowledgeEntry {
                    source: file.display().to_string(),
                    detail: format!("config-file:{name}"),
                });
            }
        }
    }

    Ok(entries)
}

/// Recursively collect regular files under `dir`.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ScanError> {
    let read_dir = std::fs::read_dir(dir).map_err(|source| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in read_dir {
        let entry = entry.map_err(|source| ScanError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            collect_files(&path, out)?;
        } else if path.is_file() {
            out.push(path);
        }
    }

    Ok(())
}

/// List interesting entry names inside one mod archive, capped.
fn scan_archive(
    path: &Path,
    max_entries: usize,
    out: &mut Vec<KnowledgeEntry>,
) -> Result<(), ScanError> {
    let file = File::open(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut archive = ZipArchive::new(file).map_err(|e| ScanError::Archive {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut taken = 0;
    for index in 0..archive.len() {
        if taken >= max_entries {
            break;
        }

        let entry = archive.by_index_raw(index).map_err(|e| ScanError::Archive {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if entry.is_dir() {
            continue;
        }

        let name = entry.name();
        if name.ends_with(".class")
            || name.ends_with("mods.toml")
            || name.ends_with("pack.mcmeta")
            || name.ends_with(".json")
        {
            out.push(KnowledgeEntry {
                source: path.display().to_string(),
                detail: name.to_string(),
            });
            taken += 1;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn scan_config(roots: Vec<PathBuf>) -> HostingConfig {
        HostingConfig {
            knowledge_scan_enabled: true,
            knowledge_scan_roots: roots,
            ..Default::default()
        }
    }

    #[test]
    fn test_disabled_scan_returns_nothing() {
        let config = HostingConfig {
            knowledge_scan_enabled: false,
            ..Default::default()
        };

        assert!(KnowledgeScanner::new().scan(&config).unwrap().is_empty());
    }

    #[test]
    fn test_missing_roots_are_skipped() {
        let config = scan_config(vec![PathBuf::from("/definitely/not/a/real/mods/dir")]);
        assert!(KnowledgeScanner::new().scan(&config).unwrap().is_empty());
    }

    #[test]
    fn test_loose_config_files_are_indexed_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.toml"), "b").unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("ignored.png"), [0u8; 4]).unwrap();

        let config = scan_config(vec![dir.path().to_path_buf()]);
        let indexes = KnowledgeScanner::new().scan(&config).unwrap();

        assert_eq!(indexes.len(), 1);
        assert_eq!(indexes[0].subsystem, "default");
        let details: Vec<&str> = indexes[0]
            .entries
            .iter()
            .map(|e| e.detail.as_str())
            .collect();
        assert_eq!(details, vec!["config-file:a.json", "config-file:b.toml"]);
    }

    #[test]
    fn test_objectives_fan_out_over_the_same_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pack.mcmeta"), "{}").unwrap();

        let mut config = scan_config(vec![dir.path().to_path_buf()]);
        config.subsystem_objectives = BTreeMap::from([
            ("Builder".to_string(), "Construction tips".to_string()),
            ("Sentinel".to_string(), "Strategy guidance".to_string()),
        ]);

        let indexes = KnowledgeScanner::new().scan(&config).unwrap();

        assert_eq!(indexes.len(), 2);
        assert!(indexes.iter().any(|i| i.subsystem == "Builder"));
        assert!(indexes.iter().any(|i| i.subsystem == "Sentinel"));
        assert_eq!(indexes[0].entries, indexes[1].entries);
    }

    #[test]
    fn test_garbage_archive_aborts_the_scan() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.jar"), b"not a zip").unwrap();

        let config = scan_config(vec![dir.path().to_path_buf()]);
        let err = KnowledgeScanner::new().scan(&config).unwrap_err();

        assert!(matches!(err, ScanError::Archive { .. }));
    }
}
