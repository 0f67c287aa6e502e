//! # Document Store Seam
//!
//! The trait every write backend implements, plus a dry-run store that only
//! logs what would be written.

use crate::document::DocumentRef;
use crate::errors::StoreError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

/// A backend that can persist a single document.
///
/// `set_document` has replace semantics: once it returns `Ok`, the stored
/// document holds exactly `data` and nothing from any earlier version. A
/// missing document is created.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn set_document(
        &self,
        doc: &DocumentRef,
        data: &Map<String, Value>,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Box<T> {
    async fn set_document(
        &self,
        doc: &DocumentRef,
        data: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        (**self).set_document(doc, data).await
    }
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn set_document(
        &self,
        doc: &DocumentRef,
        data: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        (**self).set_document(doc, data).await
    }
}

/// A store that accepts every write without touching the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunStore;

#[async_trait]
impl DocumentStore for DryRunStore {
    async fn set_document(
        &self,
        doc: &DocumentRef,
        data: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        info!("[dry-run] Would write {} field(s) to '{doc}'.", data.len());
        Ok(())
    }
}
