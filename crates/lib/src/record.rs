//! # Input Records
//!
//! Loading the data file and deriving per-record document keys.

use crate::document::validate_document_id;
use crate::errors::{json_type_name, UploadError};
use serde_json::{Map, Number, Value};
use std::{fs, path::Path};
use tracing::info;

/// Where a record should be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKey {
    /// The record supplied its own id.
    Provided(String),
    /// The record has no usable id; a fresh one is generated at write time.
    Generate,
}

/// One element of the input array, tagged with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    index: usize,
    value: Value,
}

impl Record {
    pub fn new(index: usize, value: Value) -> Self {
        Self { index, value }
    }

    /// Zero-based position in the input array.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The object payload written to the document, `id` included.
    pub fn fields(&self) -> Result<&Map<String, Value>, UploadError> {
        self.value
            .as_object()
            .ok_or_else(|| UploadError::InvalidRecord {
                index: self.index,
                found: json_type_name(&self.value),
            })
    }

    /// Derives the document key from the `id` field.
    ///
    /// Falsy ids (`null`, `false`, `0`, `""`) and a missing id mean "generate".
    /// Strings are used verbatim, other numbers use their decimal form and
    /// `true` becomes `"true"`. Objects and arrays are rejected.
    pub fn document_key(&self) -> Result<DocumentKey, UploadError> {
        let invalid = |reason: String| UploadError::InvalidId {
            index: self.index,
            reason,
        };

        let id = match self.value.get("id") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => {
                return Ok(DocumentKey::Generate)
            }
            Some(Value::String(s)) if s.is_empty() => return Ok(DocumentKey::Generate),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => {
                return Ok(DocumentKey::Generate)
            }
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => number_id(n),
            Some(Value::Bool(true)) => "true".to_string(),
            Some(other) => {
                return Err(invalid(format!(
                    "expected a string or number, found {}",
                    json_type_name(other)
                )))
            }
        };

        validate_document_id(&id).map_err(invalid)?;
        Ok(DocumentKey::Provided(id))
    }

    /// The `name` field for log lines, if the record has one.
    pub fn display_name(&self) -> Option<String> {
        match self.value.get("name")? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Decimal form of a numeric id. Integral floats drop the fraction, so `1.0`
/// and `1` address the same document (`1e2` → `100`).
fn number_id(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

/// Reads and parses the data file into records.
///
/// The file must hold a JSON array. Element types are not checked here; a
/// non-object element fails when the uploader reaches it.
pub fn load_records(path: &Path) -> Result<Vec<Record>, UploadError> {
    let content = fs::read_to_string(path).map_err(|source| UploadError::DataFile {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(path, &content)?;
    info!(
        "Loaded {} records from '{}'.",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Parses data file content. `path` is only used in error messages.
pub fn parse_records(path: &Path, content: &str) -> Result<Vec<Record>, UploadError> {
    let value: Value = serde_json::from_str(content).map_err(|source| UploadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(index, value)| Record::new(index, value))
            .collect()),
        other => Err(UploadError::NotAnArray {
            path: path.to_path_buf(),
            found: json_type_name(&other),
        }),
    }
}
