//! Knowledge scanner end-to-end tests over real archives.
//!
//! Fixtures are written into a tempdir with `zip::ZipWriter`, then scanned
//! through the public API, exercising the same read path the hosting
//! manager triggers.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use emberlink::hosting::HostingConfig;
use emberlink::knowledge::KnowledgeScanner;
use zip::write::SimpleFileOptions;

fn write_mod_archive(path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for (name, contents) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(contents).unwrap();
    }

    writer.finish().unwrap();
}

#[test]
fn scans_archive_and_builds_per_subsystem_knowledge() {
    let dir = tempfile::tempdir().unwrap();
    let mods_dir = dir.path().join("mods");
    std::fs::create_dir_all(&mods_dir).unwrap();

    write_mod_archive(
        &mods_dir.join("example-mod.jar"),
        &[
            ("META-INF/mods.toml", b"modLoader=\"javafml\"" as &[u8]),
            ("com/example/ExampleFeature.class", &[0x01, 0x02, 0x03]),
            ("assets/example/texture.png", &[0u8; 8]),
        ],
    );

    let config = HostingConfig {
        knowledge_scan_enabled: true,
        knowledge_scan_roots: vec![mods_dir],
        subsystem_objectives: BTreeMap::from([
            ("Sentinel".to_string(), "General strategy guidance".to_string()),
            (
                "Builder".to_string(),
                "Construction and progression tips".to_string(),
            ),
        ]),
        ..Default::default()
    };

    let indexes = KnowledgeScanner::new().scan(&config).unwrap();

    assert_eq!(indexes.len(), 2);
    assert!(indexes.iter().any(|i| i.subsystem == "Sentinel"));
    assert!(indexes.iter().any(|i| i.subsystem == "Builder"));
    assert!(indexes.iter().all(|i| !i.entries.is_empty()));

    // Metadata and class entries are indexed; the texture is not.
    let details: Vec<&str> = indexes[0]
        .entries
        .iter()
        .map(|e| e.detail.as_str())
        .collect();
    assert!(details.contains(&"META-INF/mods.toml"));
    assert!(details.contains(&"com/example/ExampleFeature.class"));
    assert!(!details.iter().any(|d| d.ends_with(".png")));
}

#[test]
fn per_archive_entry_cap_is_honored() {
    let dir = tempfile::tempdir().unwrap();

    let entries: Vec<(String, Vec<u8>)> = (0..10)
        .map(|i| (format!("com/example/Class{i:02}.class"), vec![0u8; 4]))
        .collect();
    let borrowed: Vec<(&str, &[u8])> = entries
        .iter()
        .map(|(name, data)| (name.as_str(), data.as_slice()))
        .collect();
    write_mod_archive(&dir.path().join("big-mod.jar"), &borrowed);

    let config = HostingConfig {
        knowledge_scan_enabled: true,
        knowledge_scan_roots: vec![dir.path().to_path_buf()],
        max_entries_per_archive: 4,
        ..Default::default()
    };

    let indexes = KnowledgeScanner::new().scan(&config).unwrap();

    assert_eq!(indexes.len(), 1);
    assert_eq!(indexes[0].entries.len(), 4);
}

#[test]
fn archives_and_loose_files_combine_in_walk_order() {
    let dir = tempfile::tempdir().unwrap();
    let mods_dir = dir.path().join("mods");
    std::fs::create_dir_all(&mods_dir).unwrap();

    write_mod_archive(
        &mods_dir.join("a-mod.jar"),
        &[("pack.mcmeta", b"{}" as &[u8])],
    );
    std::fs::write(mods_dir.join("z-config.toml"), "enabled = true").unwrap();

    let config = HostingConfig {
        knowledge_scan_enabled: true,
        knowledge_scan_roots: vec![mods_dir.clone()],
        ..Default::default()
    };

    let indexes = KnowledgeScanner::new().scan(&config).unwrap();

    assert_eq!(indexes.len(), 1);
    let sources: Vec<&str> = indexes[0]
        .entries
        .iter()
        .map(|e| e.source.as_str())
        .collect();
    let jar_source = mods_dir.join("a-mod.jar").display().to_string();
    let toml_source = mods_dir.join("z-config.toml").display().to_string();
    assert_eq!(sources, vec![jar_source.as_str(), toml_source.as_str()]);
}
