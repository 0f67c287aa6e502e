//! # Uploader
//!
//! Writes records into a collection one at a time, stopping at the first
//! failure.

use crate::document::{CollectionRef, DocumentRef};
use crate::errors::UploadError;
use crate::record::{DocumentKey, Record};
use crate::store::DocumentStore;
use tracing::{debug, info};

/// Lifecycle of an upload run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

impl UploadState {
    /// Exit code for a terminal state, `None` while the run is not finished.
    pub fn exit_code(self) -> Option<i32> {
        match self {
            UploadState::Succeeded => Some(crate::EXIT_SUCCESS),
            UploadState::Failed => Some(crate::EXIT_FAILURE),
            UploadState::NotStarted | UploadState::Running => None,
        }
    }
}

/// Summary of a fully successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub collection: String,
    /// Every document written, in input order.
    pub written: Vec<DocumentRef>,
}

impl UploadReport {
    pub fn count(&self) -> usize {
        self.written.len()
    }
}

/// Sequential record writer over an injected `DocumentStore`.
pub struct Uploader<S> {
    store: S,
    collection: CollectionRef,
    state: UploadState,
}

impl<S: DocumentStore> Uploader<S> {
    pub fn new(store: S, collection: CollectionRef) -> Self {
        Self {
            store,
            collection,
            state: UploadState::NotStarted,
        }
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    /// Writes every record in order, awaiting each write before the next.
    ///
    /// The first invalid record or rejected write ends the run; records after
    /// it are never attempted.
    pub async fn upload(&mut self, records: &[Record]) -> Result<UploadReport, UploadError> {
        self.upload_with(records, |_, _| {}).await
    }

    /// Like `upload`, calling `on_written` with the record's label and target
    /// after each acknowledged write.
    ///
    /// The label is the record's `name`, or the document path when it has none.
    pub async fn upload_with<F>(
        &mut self,
        records: &[Record],
        on_written: F,
    ) -> Result<UploadReport, UploadError>
    where
        F: FnMut(&str, &DocumentRef),
    {
        self.state = UploadState::Running;
        info!(
            "Uploading {} records to collection '{}'.",
            records.len(),
            self.collection.name()
        );

        let result = self.write_all(records, on_written).await;
        self.state = match &result {
            Ok(report) => {
                info!(
                    "Upload finished: {} documents written to '{}'.",
                    report.count(),
                    report.collection
                );
                UploadState::Succeeded
            }
            Err(e) => {
                // Reported once by the caller.
                debug!("Upload aborted: {e}");
                UploadState::Failed
            }
        };
        result
    }

    async fn write_all<F>(
        &self,
        records: &[Record],
        mut on_written: F,
    ) -> Result<UploadReport, UploadError>
    where
        F: FnMut(&str, &DocumentRef),
    {
        let mut written = Vec::with_capacity(records.len());

        for record in records {
            let fields = record.fields()?;
            let doc = match record.document_key()? {
                DocumentKey::Provided(id) => self.collection.doc(id),
                DocumentKey::Generate => self.collection.new_doc(),
            };

            self.store
                .set_document(&doc, fields)
                .await
                .map_err(|source| UploadError::Write {
                    index: record.index(),
                    document: doc.path(),
                    written: written.len(),
                    source,
                })?;

            let label = record.display_name().unwrap_or_else(|| doc.path());
            on_written(&label, &doc);
            info!("Wrote record {} to '{doc}'.", record.index());
            written.push(doc);
        }

        Ok(UploadReport {
            collection: self.collection.name().to_string(),
            written,
        })
    }
}
