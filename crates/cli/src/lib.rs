//! # `docload-cli` Library Crate
//!
//! Argument parsing and orchestration for the `docload` binary. The binary
//! itself only sets up logging and turns the result into an exit code.

use anyhow::{Context, Result};
use clap::Parser;
use docload::{
    load_config, run_upload, DocumentStore, DryRunStore, UploadConfig, UploadReport,
};
use docload_firebase::FirestoreStore;
use std::path::PathBuf;
use tracing::info;

// --- CLI Argument Struct ---

/// Upload a JSON array of records into a Firestore collection.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML config file. Defaults to `docload.yml` when it exists.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Service-account key file.
    #[arg(long)]
    pub credentials: Option<PathBuf>,
    /// JSON file holding an array of objects.
    #[arg(long)]
    pub data: Option<PathBuf>,
    /// Target collection name.
    #[arg(long)]
    pub collection: Option<String>,
    /// Google Cloud project ID. Inferred from the key file when omitted.
    #[arg(long)]
    pub project_id: Option<String>,
    /// Firestore database ID, for projects with more than one database.
    #[arg(long)]
    pub database_id: Option<String>,
    /// Firestore emulator address, e.g. `localhost:8080`.
    #[arg(long)]
    pub emulator_host: Option<String>,
    /// Parse the data file and log each write without contacting Firestore.
    #[arg(long)]
    pub dry_run: bool,
}

/// Loads file/env configuration and applies command-line overrides.
pub fn resolve_config(cli: &Cli) -> Result<UploadConfig> {
    let mut config = load_config(cli.config.as_deref())?;

    if let Some(path) = &cli.credentials {
        config.credential_path = path.clone();
    }
    if let Some(path) = &cli.data {
        config.data_path = path.clone();
    }
    if let Some(collection) = &cli.collection {
        config.collection = collection.clone();
    }
    if let Some(project_id) = &cli.project_id {
        config.project_id = Some(project_id.clone());
    }
    if let Some(database_id) = &cli.database_id {
        config.database_id = Some(database_id.clone());
    }
    if let Some(host) = &cli.emulator_host {
        config.emulator_host = Some(host.clone());
    }

    config.validate()?;
    Ok(config)
}

// --- Public Entrypoint ---

/// Connects the store, then uploads the data file.
pub async fn run(cli: Cli) -> Result<UploadReport> {
    let config = resolve_config(&cli)?;
    info!("Resolved configuration: {:?}", config);

    let store: Box<dyn DocumentStore> = if cli.dry_run {
        info!("Dry run: no documents will be written.");
        Box::new(DryRunStore)
    } else {
        let store = FirestoreStore::connect(&config)
            .await
            .map_err(docload::UploadError::from)?;
        Box::new(store)
    };

    let verb = if cli.dry_run { "Would upload" } else { "Uploaded" };
    let report = run_upload(&config, store, |label, _| println!("{verb}: {label}"))
        .await
        .with_context(|| format!("Upload to collection '{}' failed", config.collection))?;
    Ok(report)
}
