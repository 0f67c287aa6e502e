//! # docload
//!
//! Core of the JSON-to-document-database loader. It reads an array of JSON
//! objects and writes each one, in order, as a document in a collection. The
//! database itself sits behind the `DocumentStore` trait so that backends
//! (Firestore, dry-run, test mocks) can be swapped without touching the
//! upload logic.

pub mod config;
pub mod document;
pub mod errors;
pub mod record;
pub mod store;
pub mod uploader;

pub use self::config::{load_config, UploadConfig};
pub use document::{auto_id, CollectionRef, DocumentRef};
pub use errors::{StoreError, UploadError};
pub use record::{load_records, parse_records, DocumentKey, Record};
pub use store::{DocumentStore, DryRunStore};
pub use uploader::{UploadReport, UploadState, Uploader};

/// Exit status for a run where every record was written.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status for any failure.
pub const EXIT_FAILURE: i32 = 1;

/// Loads the data file named in `config` and uploads it through `store`.
///
/// The store is expected to be connected already, so credential problems
/// surface before the data file is read. `on_written` runs after each
/// acknowledged write with the record's label and target.
pub async fn run_upload<S, F>(
    config: &UploadConfig,
    store: S,
    on_written: F,
) -> Result<UploadReport, UploadError>
where
    S: DocumentStore,
    F: FnMut(&str, &DocumentRef),
{
    let collection = CollectionRef::new(config.collection.as_str())?;
    let records = load_records(&config.data_path)?;
    Uploader::new(store, collection)
        .upload_with(&records, on_written)
        .await
}
