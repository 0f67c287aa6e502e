//! # Record Loading Tests
//!
//! Covers data file parsing and the id derivation rules.

use anyhow::Result;
use docload::{load_records, parse_records, DocumentKey, Record, UploadError};
use docload_test_utils::DataFixture;
use serde_json::json;
use std::path::Path;

fn key_for(value: serde_json::Value) -> Result<DocumentKey, UploadError> {
    Record::new(0, value).document_key()
}

#[test]
fn test_load_records_preserves_order() -> Result<()> {
    let fixture = DataFixture::from_json(&json!([
        {"id": 1, "name": "Ada"},
        {"name": "Grace"},
        {"id": "x9", "name": "Edsger"}
    ]))?;

    let records = load_records(&fixture.path)?;

    assert_eq!(records.len(), 3);
    let names: Vec<_> = records.iter().filter_map(|r| r.display_name()).collect();
    assert_eq!(names, vec!["Ada", "Grace", "Edsger"]);
    assert_eq!(records[2].index(), 2);
    Ok(())
}

#[test]
fn test_load_records_empty_array() -> Result<()> {
    let fixture = DataFixture::new("[]")?;
    assert!(load_records(&fixture.path)?.is_empty());
    Ok(())
}

#[test]
fn test_load_records_missing_file() {
    let result = load_records(Path::new("does/not/exist.json"));
    assert!(matches!(result, Err(UploadError::DataFile { .. })));
}

#[test]
fn test_load_records_malformed_json() -> Result<()> {
    let fixture = DataFixture::new("[{\"id\": 1,,}]")?;
    let result = load_records(&fixture.path);
    assert!(matches!(result, Err(UploadError::Parse { .. })));
    Ok(())
}

#[test]
fn test_parse_records_rejects_non_array() {
    let result = parse_records(Path::new("data.json"), r#"{"id": 1}"#);
    match result {
        Err(UploadError::NotAnArray { found, .. }) => assert_eq!(found, "an object"),
        other => panic!("expected NotAnArray, got {other:?}"),
    }
}

#[test]
fn test_document_key_uses_provided_ids() -> Result<()> {
    assert_eq!(
        key_for(json!({"id": "42"}))?,
        DocumentKey::Provided("42".to_string())
    );
    assert_eq!(
        key_for(json!({"id": 42}))?,
        DocumentKey::Provided("42".to_string())
    );
    assert_eq!(
        key_for(json!({"id": 1.5}))?,
        DocumentKey::Provided("1.5".to_string())
    );
    assert_eq!(
        key_for(json!({"id": -7}))?,
        DocumentKey::Provided("-7".to_string())
    );
    assert_eq!(
        key_for(json!({"id": true}))?,
        DocumentKey::Provided("true".to_string())
    );
    Ok(())
}

#[test]
fn test_document_key_integral_floats_match_integers() -> Result<()> {
    let records = parse_records(
        Path::new("data.json"),
        r#"[{"id": 1.0}, {"id": 1e2}, {"id": -3.0}, {"id": 2.50}, {"id": 1e21}]"#,
    )?;
    let keys = records
        .iter()
        .map(Record::document_key)
        .collect::<Result<Vec<_>, _>>()?;

    assert_eq!(
        keys,
        vec![
            DocumentKey::Provided("1".to_string()),
            DocumentKey::Provided("100".to_string()),
            DocumentKey::Provided("-3".to_string()),
            DocumentKey::Provided("2.5".to_string()),
            DocumentKey::Provided("1e21".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_document_key_generates_for_falsy_ids() -> Result<()> {
    for value in [
        json!({"name": "no id"}),
        json!({"id": null}),
        json!({"id": false}),
        json!({"id": 0}),
        json!({"id": 0.0}),
        json!({"id": ""}),
    ] {
        assert_eq!(key_for(value)?, DocumentKey::Generate);
    }
    Ok(())
}

#[test]
fn test_document_key_rejects_unusable_ids() {
    for value in [
        json!({"id": {"nested": 1}}),
        json!({"id": [1, 2]}),
        json!({"id": "a/b"}),
        json!({"id": ".."}),
    ] {
        assert!(
            matches!(key_for(value.clone()), Err(UploadError::InvalidId { index: 0, .. })),
            "expected InvalidId for {value}"
        );
    }
}

#[test]
fn test_fields_requires_object() {
    let record = Record::new(3, json!("just a string"));
    match record.fields() {
        Err(UploadError::InvalidRecord { index, found }) => {
            assert_eq!(index, 3);
            assert_eq!(found, "a string");
        }
        other => panic!("expected InvalidRecord, got {other:?}"),
    }
}

#[test]
fn test_fields_keep_id_in_payload() -> Result<()> {
    let record = Record::new(0, json!({"id": "7", "name": "Barbara"}));
    let fields = record.fields()?;
    assert_eq!(fields.get("id"), Some(&json!("7")));
    assert_eq!(fields.len(), 2);
    Ok(())
}

#[test]
fn test_display_name() {
    assert_eq!(
        Record::new(0, json!({"name": "Ada"})).display_name(),
        Some("Ada".to_string())
    );
    assert_eq!(
        Record::new(0, json!({"name": 12})).display_name(),
        Some("12".to_string())
    );
    assert_eq!(Record::new(0, json!({"id": 1})).display_name(), None);
}
