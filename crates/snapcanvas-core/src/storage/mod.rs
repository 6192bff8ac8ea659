//! Persistence of document payloads.
//!
//! Backends keep the same JSON the editor saves, so a stored payload is
//! checked when it goes in and again when it comes out.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::document::{DocumentError, DocumentPayload};
use crate::panel::SplitMode;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no stored document {0:?}")]
    NotFound(String),
    #[error("invalid document id {0:?}: use letters, digits, '-' and '_'")]
    InvalidId(String),
    #[error("document {id:?}: {source}")]
    Document {
        id: String,
        #[source]
        source: DocumentError,
    },
    #[error("storage I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage lock poisoned")]
    Poisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A stored document as reported by `Storage::list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: String,
    pub split_mode: SplitMode,
    pub shapes: usize,
    pub strokes: usize,
}

impl StoredDocument {
    fn describe(id: &str, payload: &DocumentPayload) -> Self {
        Self {
            id: id.to_string(),
            split_mode: payload.split_mode,
            shapes: payload.shapes.len(),
            strokes: payload.drawings.values().map(Vec::len).sum(),
        }
    }
}

pub trait Storage: Send + Sync {
    fn save(&self, id: &str, document: &DocumentPayload) -> BoxFuture<'_, StorageResult<()>>;

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<DocumentPayload>>;

    /// Remove a stored document; `NotFound` when there is none.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;

    /// Every readable stored document, sorted by id.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<StoredDocument>>>;
}

/// Ids double as file stems, so they are restricted to a portable set.
fn check_id(id: &str) -> StorageResult<()> {
    let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid { Ok(()) } else { Err(StorageError::InvalidId(id.to_string())) }
}

fn encode(id: &str, document: &DocumentPayload) -> StorageResult<String> {
    document.to_json().map_err(|source| StorageError::Document {
        id: id.to_string(),
        source,
    })
}

fn decode(id: &str, json: &str) -> StorageResult<DocumentPayload> {
    DocumentPayload::from_json(json).map_err(|source| StorageError::Document {
        id: id.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_charset() {
        assert!(check_id("board-2_final").is_ok());
        for bad in ["", "../etc", "a b", "doc.json", "ünï"] {
            assert!(matches!(check_id(bad), Err(StorageError::InvalidId(_))), "{bad}");
        }
    }

    #[test]
    fn test_decode_failure_names_document() {
        let err = decode("broken", "{ not json").unwrap_err();
        assert!(matches!(&err, StorageError::Document { id, .. } if id == "broken"));
    }
}
