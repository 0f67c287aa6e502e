//! Service-account key loading and project id resolution.

use crate::FirebaseError;
use serde::Deserialize;
use serde_json::error::Category;
use std::{fmt, fs, path::Path};

const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// The parts of a Google service-account key file this tool relies on.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
}

// Keeps key material out of logs.
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("key_type", &self.key_type)
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Reads and validates a key file.
    pub fn from_file(path: &Path) -> Result<Self, FirebaseError> {
        let content = fs::read_to_string(path).map_err(|source| FirebaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Parses key file content. `path` is only used in error messages.
    pub fn parse(path: &Path, content: &str) -> Result<Self, FirebaseError> {
        let key: ServiceAccountKey = serde_json::from_str(content).map_err(|e| match e.classify() {
            Category::Data => FirebaseError::InvalidKey {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
            _ => FirebaseError::Json {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let invalid = |reason: &str| FirebaseError::InvalidKey {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };
        if key.key_type != SERVICE_ACCOUNT_TYPE {
            return Err(invalid(&format!(
                "expected type '{SERVICE_ACCOUNT_TYPE}', found '{}'",
                key.key_type
            )));
        }
        if key.client_email.trim().is_empty() {
            return Err(invalid("client_email is empty"));
        }
        if key.private_key.trim().is_empty() {
            return Err(invalid("private_key is empty"));
        }
        Ok(key)
    }
}

/// Picks the project id: the explicit value first, then the key's own.
pub fn resolve_project_id(
    explicit: Option<&str>,
    key: &ServiceAccountKey,
) -> Result<String, FirebaseError> {
    if let Some(id) = explicit.filter(|id| !id.trim().is_empty()) {
        return Ok(id.to_string());
    }
    key.project_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
        .ok_or(FirebaseError::MissingProjectId)
}
