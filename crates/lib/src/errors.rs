use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an upload run.
///
/// Every variant is fatal: the uploader stops at the first one and the caller
/// reports it once before exiting with a failure status.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Credential error: {0}")]
    Credential(String),
    #[error("Failed to read data file '{}': {source}", .path.display())]
    DataFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse data file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Data file '{}' must contain a JSON array, found {found}", .path.display())]
    NotAnArray { path: PathBuf, found: &'static str },
    #[error("Record {index} is not a JSON object (found {found})")]
    InvalidRecord { index: usize, found: &'static str },
    #[error("Record {index} has an unusable id: {reason}")]
    InvalidId { index: usize, reason: String },
    #[error(
        "Failed to write record {index} to '{document}' after {written} successful writes: {source}"
    )]
    Write {
        index: usize,
        document: String,
        written: usize,
        #[source]
        source: StoreError,
    },
}

impl UploadError {
    /// The process exit code for this failure. All failures share one code.
    pub fn exit_code(&self) -> i32 {
        crate::EXIT_FAILURE
    }
}

impl From<config::ConfigError> for UploadError {
    fn from(err: config::ConfigError) -> Self {
        UploadError::Config(err.to_string())
    }
}

/// Errors reported by a `DocumentStore` backend for a single write.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Write rejected by the database: {0}")]
    Rejected(String),
    #[error("Failed to encode document: {0}")]
    Encode(String),
    #[error("Database unavailable: {0}")]
    Unavailable(String),
}

/// Short name of a JSON value's type, used in error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
