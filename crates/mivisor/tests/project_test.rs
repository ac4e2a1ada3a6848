//! Integration tests for project configuration documents.

use std::fs;

use tempfile::TempDir;

use mivisor::project::config_path;
use mivisor::{ColumnRole, MivisorError, ProjectConfig};

fn sample_config() -> ProjectConfig {
    let mut config = ProjectConfig::new("lab", "Ward survey project");
    for column in ["HN", "Received", "Organism", "AMP"] {
        config.set_column_role(column, ColumnRole::Keep, true);
    }
    config.set_column_role("HN", ColumnRole::Key, true);
    config.set_column_role("Received", ColumnRole::Date, true);
    config.set_column_role("AMP", ColumnRole::Drug, true);
    config.set_column_role("Organism", ColumnRole::Organism, true);
    config.set_alias("HN", "Hospital number");
    config.set_description("AMP", "Ampicillin disk diffusion");
    config
}

#[test]
fn test_save_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = sample_config();

    config.save(dir.path()).unwrap();
    let loaded = ProjectConfig::load(dir.path()).unwrap();

    assert_eq!(loaded, config);
    assert_eq!(
        loaded.keep_columns.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["HN", "Received", "Organism", "AMP"]
    );
}

#[test]
fn test_document_uses_short_keys() {
    let dir = TempDir::new().unwrap();
    sample_config().save(dir.path()).unwrap();

    let text = fs::read_to_string(config_path(dir.path())).unwrap();
    assert!(text.contains("desc: Ward survey project"));
    assert!(text.contains("descs:"));
    assert!(text.contains("organism_column: Organism"));
}

#[test]
fn test_missing_keys_default() {
    let dir = TempDir::new().unwrap();
    fs::write(
        config_path(dir.path()),
        "creator: lab\nkeep_columns:\n  - HN\norganism_column: ''\naliases:\n",
    )
    .unwrap();

    let config = ProjectConfig::load(dir.path()).unwrap();

    assert_eq!(config.creator, "lab");
    assert_eq!(config.description, "");
    assert_eq!(config.keep_columns.len(), 1);
    assert!(config.drug_columns.is_empty());
    assert_eq!(config.organism_column, None);
    assert!(config.aliases.is_empty());
}

#[test]
fn test_unset_organism_column_written_as_empty_string() {
    let dir = TempDir::new().unwrap();
    ProjectConfig::new("lab", "x").save(dir.path()).unwrap();

    let text = fs::read_to_string(config_path(dir.path())).unwrap();
    assert!(text.contains("organism_column: ''"));
}

#[test]
fn test_toggle_keep_on_then_off_restores_columns() {
    let mut config = sample_config();
    let before = config.keep_columns.clone();

    config.set_column_role("Ward", ColumnRole::Keep, true);
    config.set_column_role("Ward", ColumnRole::Keep, false);

    assert_eq!(config.keep_columns, before);
}

#[test]
fn test_single_organism_column() {
    let mut config = sample_config();

    config.set_column_role("Specimen", ColumnRole::Organism, true);
    assert_eq!(config.organism_column.as_deref(), Some("Specimen"));

    // Clearing a column that is not the organism column changes nothing.
    config.set_column_role("Organism", ColumnRole::Organism, false);
    assert_eq!(config.organism_column.as_deref(), Some("Specimen"));

    config.set_column_role("Specimen", ColumnRole::Organism, false);
    assert_eq!(config.organism_column, None);
}

#[test]
fn test_save_replaces_previous_document() {
    let dir = TempDir::new().unwrap();
    let mut config = sample_config();
    config.save(dir.path()).unwrap();

    config.set_alias("HN", "");
    config.save(dir.path()).unwrap();

    let loaded = ProjectConfig::load(dir.path()).unwrap();
    assert_eq!(loaded.alias("HN"), None);

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name() != "config.yml")
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_open_missing_project() {
    let dir = TempDir::new().unwrap();
    let err = ProjectConfig::load(dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, MivisorError::MissingConfig { .. }));
}
