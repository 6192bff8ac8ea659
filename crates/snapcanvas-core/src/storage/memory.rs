//! Scratch storage held in process memory.

use super::{BoxFuture, Storage, StorageError, StorageResult, StoredDocument, check_id, decode, encode};
use crate::document::DocumentPayload;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Keeps serialized payloads keyed by id.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, document: &DocumentPayload) -> BoxFuture<'_, StorageResult<()>> {
        let entry = check_id(id).and_then(|()| Ok((id.to_string(), encode(id, document)?)));
        Box::pin(async move {
            let (id, json) = entry?;
            self.documents.write().map_err(|_| StorageError::Poisoned)?.insert(id, json);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<DocumentPayload>> {
        let id = id.to_string();
        Box::pin(async move {
            let documents = self.documents.read().map_err(|_| StorageError::Poisoned)?;
            let json = documents.get(&id).ok_or_else(|| StorageError::NotFound(id.clone()))?;
            decode(&id, json)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            check_id(&id)?;
            let mut documents = self.documents.write().map_err(|_| StorageError::Poisoned)?;
            match documents.remove(&id) {
                Some(_) => Ok(()),
                None => Err(StorageError::NotFound(id)),
            }
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            check_id(&id)?;
            let documents = self.documents.read().map_err(|_| StorageError::Poisoned)?;
            Ok(documents.contains_key(&id))
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<StoredDocument>>> {
        Box::pin(async move {
            let documents = self.documents.read().map_err(|_| StorageError::Poisoned)?;
            documents
                .iter()
                .map(|(id, json)| Ok(StoredDocument::describe(id, &decode(id, json)?)))
                .collect()
        })
    }
}
