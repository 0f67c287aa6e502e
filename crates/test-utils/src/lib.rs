use anyhow::Result;
use async_trait::async_trait;
use docload::{DocumentRef, DocumentStore, StoreError};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// --- Fixture Files ---

/// A temporary directory holding a data file, removed on drop.
pub struct DataFixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl DataFixture {
    /// Writes `content` verbatim to `data.json` in a fresh temp directory.
    pub fn new(content: &str) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.json");
        let mut file = std::fs::File::create(&path)?;
        file.write_all(content.as_bytes())?;
        Ok(Self { dir, path })
    }

    /// Serializes `value` into the data file.
    pub fn from_json(value: &Value) -> Result<Self> {
        Self::new(&serde_json::to_string_pretty(value)?)
    }
}

// --- Mock Document Store ---

#[derive(Debug, Default)]
struct MockState {
    documents: HashMap<String, Map<String, Value>>,
    calls: Vec<String>,
    fail_on_call: Option<usize>,
    in_flight: usize,
    max_in_flight: usize,
}

/// An in-memory `DocumentStore` that records every write attempt.
///
/// Clones share state, so a test can keep one handle while the uploader owns
/// another.
#[derive(Clone, Debug, Default)]
pub struct MockDocumentStore {
    state: Arc<Mutex<MockState>>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects the `n`th write attempt (1-based).
    pub fn failing_on(n: usize) -> Self {
        let store = Self::new();
        store.state.lock().unwrap().fail_on_call = Some(n);
        store
    }

    /// Pre-populates a document, e.g. to check replace semantics.
    pub fn seed(&self, path: &str, data: Value) {
        let fields = match data {
            Value::Object(map) => map,
            other => panic!("seed data must be an object, got {other}"),
        };
        self.state
            .lock()
            .unwrap()
            .documents
            .insert(path.to_string(), fields);
    }

    /// Document paths in the order writes were attempted, failed ones included.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn document(&self, path: &str) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .documents
            .get(path)
            .cloned()
            .map(Value::Object)
    }

    pub fn document_count(&self) -> usize {
        self.state.lock().unwrap().documents.len()
    }

    /// Highest number of writes that were in progress at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn set_document(
        &self,
        doc: &DocumentRef,
        data: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        let path = doc.path();
        {
            let mut state = self.state.lock().unwrap();
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
            state.calls.push(path.clone());
            if state.fail_on_call == Some(state.calls.len()) {
                state.in_flight -= 1;
                return Err(StoreError::Rejected(format!(
                    "PERMISSION_DENIED: write to '{path}' refused"
                )));
            }
        }

        // Give any concurrently issued write a chance to start.
        tokio::task::yield_now().await;

        let mut state = self.state.lock().unwrap();
        state.documents.insert(path, data.clone());
        state.in_flight -= 1;
        Ok(())
    }
}
