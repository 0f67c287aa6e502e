//! # Upload Configuration
//!
//! Defines `UploadConfig` and loads it in layers: built-in defaults, an
//! optional YAML file, then `DOCLOAD_*` environment variables. Command-line
//! flags are applied on top by the binary.

use crate::errors::UploadError;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "docload.yml";
pub const DEFAULT_CREDENTIAL_PATH: &str = "service_key.json";
pub const DEFAULT_DATA_PATH: &str = "files/professors.json";
pub const DEFAULT_COLLECTION: &str = "professors";
/// Prefix for environment overrides, e.g. `DOCLOAD_COLLECTION`.
pub const ENV_PREFIX: &str = "DOCLOAD";

/// Everything an upload run needs, passed explicitly instead of held globally.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// Service-account key file used to authenticate.
    #[serde(default = "default_credential_path")]
    pub credential_path: PathBuf,
    /// JSON array of records to upload.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Target collection.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Overrides the `project_id` found in the key file.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Named database; the default database when unset.
    #[serde(default)]
    pub database_id: Option<String>,
    /// `host:port` of a Firestore emulator.
    #[serde(default)]
    pub emulator_host: Option<String>,
}

fn default_credential_path() -> PathBuf {
    PathBuf::from(DEFAULT_CREDENTIAL_PATH)
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            credential_path: default_credential_path(),
            data_path: default_data_path(),
            collection: default_collection(),
            project_id: None,
            database_id: None,
            emulator_host: None,
        }
    }
}

impl UploadConfig {
    /// Rejects values that can never produce a valid run.
    pub fn validate(&self) -> Result<(), UploadError> {
        crate::document::CollectionRef::new(self.collection.as_str())?;
        if self.credential_path.as_os_str().is_empty() {
            return Err(UploadError::Config(
                "credential_path must not be empty".to_string(),
            ));
        }
        if self.data_path.as_os_str().is_empty() {
            return Err(UploadError::Config("data_path must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Loads the configuration.
///
/// With `path_override` the file must exist. Without it, `docload.yml` in the
/// working directory is used when present. Environment variables such as
/// `DOCLOAD_DATA_PATH` win over the file.
pub fn load_config(path_override: Option<&Path>) -> Result<UploadConfig, UploadError> {
    let mut builder = ConfigBuilder::builder();

    let file_path = match path_override {
        Some(path) if !path.exists() => {
            return Err(UploadError::Config(format!(
                "Config file not found at '{}'",
                path.display()
            )));
        }
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            default_path.exists().then_some(default_path)
        }
    };

    if let Some(path) = file_path {
        info!("Loading configuration from '{}'.", path.display());
        let content = fs::read_to_string(&path).map_err(|e| {
            UploadError::Config(format!("Failed to read '{}': {e}", path.display()))
        })?;
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).prefix_separator("_"))
        .build()?;

    let config: UploadConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
