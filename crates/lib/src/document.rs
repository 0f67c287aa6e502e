//! # Document References
//!
//! Addressing for documents inside a collection, plus client-side generation
//! of Firestore-style auto ids.

use crate::errors::UploadError;
use std::fmt;
use uuid::Uuid;

/// Length of a generated document id.
pub const AUTO_ID_LEN: usize = 20;
/// Upper bound on the encoded size of a document id.
pub const MAX_DOCUMENT_ID_BYTES: usize = 1500;

const AUTO_ID_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
// Largest multiple of 62 that fits in a byte; values at or above it are redrawn.
const AUTO_ID_REJECT_FROM: u8 = 248;

/// A named collection that documents are written into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRef {
    name: String,
}

impl CollectionRef {
    /// Creates a reference to a top-level collection.
    ///
    /// The name must be non-empty and must not contain `/`.
    pub fn new(name: impl Into<String>) -> Result<Self, UploadError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UploadError::Config(
                "Collection name must not be empty".to_string(),
            ));
        }
        if name.contains('/') {
            return Err(UploadError::Config(format!(
                "Collection name '{name}' must not contain '/'"
            )));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A reference to the document with the given id.
    pub fn doc(&self, id: impl Into<String>) -> DocumentRef {
        DocumentRef {
            collection: self.name.clone(),
            id: id.into(),
        }
    }

    /// A reference to a new document with a freshly generated id.
    pub fn new_doc(&self) -> DocumentRef {
        self.doc(auto_id())
    }
}

/// The address of a single document: `collection/id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    pub collection: String,
    pub id: String,
}

impl DocumentRef {
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.id)
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// Generates a 20 character id drawn uniformly from `[A-Za-z0-9]`.
///
/// Entropy comes from v4 UUIDs. Bytes 6 and 8 carry the fixed version and
/// variant bits, so they are skipped.
pub fn auto_id() -> String {
    let mut id = String::with_capacity(AUTO_ID_LEN);
    while id.len() < AUTO_ID_LEN {
        let bytes = Uuid::new_v4().into_bytes();
        for (i, byte) in bytes.into_iter().enumerate() {
            if i == 6 || i == 8 || byte >= AUTO_ID_REJECT_FROM {
                continue;
            }
            id.push(AUTO_ID_ALPHABET[(byte % 62) as usize] as char);
            if id.len() == AUTO_ID_LEN {
                break;
            }
        }
    }
    id
}

/// Checks that a string can be used as a document id.
///
/// Returns the reason on failure.
pub fn validate_document_id(id: &str) -> Result<(), String> {
    if id.contains('/') {
        return Err(format!("'{id}' contains '/'"));
    }
    if id == "." || id == ".." {
        return Err(format!("'{id}' is a reserved id"));
    }
    if id.len() > MAX_DOCUMENT_ID_BYTES {
        return Err(format!(
            "id is {} bytes, the limit is {MAX_DOCUMENT_ID_BYTES}",
            id.len()
        ));
    }
    Ok(())
}
