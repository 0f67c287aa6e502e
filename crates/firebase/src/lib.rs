//! # `docload-firebase`: Firestore Backend
//!
//! This crate provides the Google Firestore implementation of the
//! `DocumentStore` trait from the core `docload` library. It loads a
//! service-account key, resolves the project, opens a `FirestoreDb` handle and
//! writes documents with full-replace semantics.

mod credentials;

pub use credentials::{resolve_project_id, ServiceAccountKey};

use async_trait::async_trait;
use docload::{DocumentRef, DocumentStore, StoreError, UploadConfig, UploadError};
use firestore::{errors::FirestoreError, FirestoreDb, FirestoreDbOptions};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum FirebaseError {
    #[error("Failed to read credential file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Credential file '{}' is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Credential file '{}' is not a service account key: {reason}", .path.display())]
    InvalidKey { path: PathBuf, reason: String },
    #[error("Project ID not provided and could not be inferred from the credential file. Please use the --project-id flag.")]
    MissingProjectId,
    #[error("Failed to connect to Firestore: {0}")]
    Connect(#[from] FirestoreError),
}

/// Everything that goes wrong before the first write is a startup credential failure.
impl From<FirebaseError> for UploadError {
    fn from(err: FirebaseError) -> Self {
        UploadError::Credential(err.to_string())
    }
}

// --- Store ---

/// The document returned by an update; only its arrival matters.
#[derive(Deserialize)]
struct WriteAck {}

/// A `DocumentStore` backed by a live Firestore database.
pub struct FirestoreStore {
    db: FirestoreDb,
}

impl FirestoreStore {
    /// Loads the credential named in `config` and opens a database handle.
    pub async fn connect(config: &UploadConfig) -> Result<Self, FirebaseError> {
        let key = ServiceAccountKey::from_file(&config.credential_path)?;
        let project_id = resolve_project_id(config.project_id.as_deref(), &key)?;
        info!(
            "Connecting to Firestore project '{project_id}' as '{}'.",
            key.client_email
        );

        let options = build_options(config, &project_id);
        let db = FirestoreDb::with_options_service_account_key_file(
            options,
            config.credential_path.clone(),
        )
        .await?;

        Ok(Self { db })
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    /// Updates without a field mask or precondition: the whole document is
    /// replaced, and created if it does not exist.
    async fn set_document(
        &self,
        doc: &DocumentRef,
        data: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        debug!("Setting document '{doc}' ({} fields).", data.len());
        self.db
            .fluent()
            .update()
            .in_col(doc.collection.as_str())
            .document_id(doc.id.as_str())
            .object(data)
            .execute::<WriteAck>()
            .await
            .map_err(store_error)?;
        Ok(())
    }
}

// --- Helper Functions ---

/// Builds client options from the configuration.
pub fn build_options(config: &UploadConfig, project_id: &str) -> FirestoreDbOptions {
    let mut options = FirestoreDbOptions::new(project_id.to_string());
    if let Some(db_id) = &config.database_id {
        options = options.with_database_id(db_id.clone());
    }
    if let Some(host) = &config.emulator_host {
        info!("Using Firestore emulator at '{host}'.");
        options = options.with_firebase_api_url(emulator_url(host));
    }
    options
}

/// Normalizes an emulator address into a base URL.
pub fn emulator_url(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

fn store_error(err: FirestoreError) -> StoreError {
    match err {
        FirestoreError::SerializeError(e) => StoreError::Encode(e.to_string()),
        FirestoreError::NetworkError(e) => StoreError::Unavailable(e.to_string()),
        other => StoreError::Rejected(other.to_string()),
    }
}
