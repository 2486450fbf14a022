//! Saving and loading trained tables through both file formats

use qtoe::q_learning::{SavedValueTable, TrainingMetadata};
use tempfile::tempdir;

mod common;
use common::train;

fn metadata() -> TrainingMetadata {
    TrainingMetadata {
        episodes_trained: Some(400),
        alpha: Some(0.1),
        gamma: Some(0.9),
        initial_epsilon: Some(0.2),
        final_epsilon: Some(0.1),
        seed: Some(99),
    }
}

#[test]
fn json_file_roundtrip_is_exact() {
    let (table, _) = train(400, 0.2, 99);
    let dir = tempdir().unwrap();
    let path = dir.path().join("agent.json");

    SavedValueTable::new(table.clone(), metadata())
        .save_to_file(&path)
        .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"version\": 1"));

    let loaded = SavedValueTable::load_from_file(&path).unwrap();
    assert_eq!(loaded.metadata, metadata());
    assert_eq!(loaded.into_table().unwrap(), table);
}

#[test]
fn msgpack_file_roundtrip_is_exact() {
    let (table, _) = train(400, 0.2, 99);
    let dir = tempdir().unwrap();
    let path = dir.path().join("agent.msgpack");

    SavedValueTable::new(table.clone(), metadata())
        .save_to_file(&path)
        .unwrap();

    // Not JSON on disk.
    let bytes = std::fs::read(&path).unwrap();
    assert!(serde_json::from_slice::<serde_json::Value>(&bytes).is_err());

    let loaded = SavedValueTable::load_from_file(&path).unwrap();
    assert_eq!(loaded.into_table().unwrap(), table);
}

#[test]
fn unsupported_version_is_rejected_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("future.json");
    std::fs::write(&path, r#"{"version": 7, "table": {}, "metadata": {}}"#).unwrap();

    let loaded = SavedValueTable::load_from_file(&path).unwrap();
    let err = loaded.into_table().unwrap_err();
    assert!(err.to_string().contains("version"));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.msgpack");
    let err = SavedValueTable::load_from_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("nope.msgpack"));
}

#[test]
fn non_canonical_state_keys_are_rejected_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.json");
    std::fs::write(
        &path,
        r#"{"version": 1, "table": {"X........": {"1,1": 0.5}, "x........": {"1,1": 0.9}}, "metadata": {}}"#,
    )
    .unwrap();

    let err = SavedValueTable::load_from_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("x........"), "{err:#}");
}
