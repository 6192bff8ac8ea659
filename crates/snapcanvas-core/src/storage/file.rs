//! One `<id>.json` payload per document in a directory.

use super::{BoxFuture, Storage, StorageError, StorageResult, StoredDocument, check_id, decode, encode};
use crate::document::DocumentPayload;
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store documents in `dir`, creating it when missing.
    pub fn new(dir: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// `<local data dir>/snapcanvas/documents`.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no data or home directory"))?;
        Self::new(base.join("snapcanvas").join("documents"))
    }

    fn path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, document: &DocumentPayload) -> BoxFuture<'_, StorageResult<()>> {
        let entry = check_id(id).and_then(|()| Ok((self.path(id), encode(id, document)?)));
        Box::pin(async move {
            let (path, json) = entry?;
            fs::write(&path, json)?;
            log::debug!("saved {}", path.display());
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<DocumentPayload>> {
        let id = id.to_string();
        Box::pin(async move {
            check_id(&id)?;
            let json = match fs::read_to_string(self.path(&id)) {
                Ok(json) => json,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StorageError::NotFound(id)),
                Err(e) => return Err(e.into()),
            };
            decode(&id, &json)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            check_id(&id)?;
            match fs::remove_file(self.path(&id)) {
                Ok(()) => {
                    log::debug!("deleted {id}");
                    Ok(())
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StorageError::NotFound(id)),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            check_id(&id)?;
            Ok(self.path(&id).is_file())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<StoredDocument>>> {
        Box::pin(async move {
            let mut listed = Vec::new();
            for entry in fs::read_dir(&self.dir)? {
                let path = entry?.path();
                if path.extension().is_none_or(|ext| ext != "json") {
                    continue;
                }
                let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if check_id(id).is_err() {
                    continue;
                }
                match fs::read_to_string(&path).map_err(StorageError::from).and_then(|json| decode(id, &json)) {
                    Ok(payload) => listed.push(StoredDocument::describe(id, &payload)),
                    Err(e) => log::warn!("skipping {}: {e}", path.display()),
                }
            }
            listed.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(listed)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, Fill};
    use crate::panel::PanelId;
    use pollster::block_on;
    use tempfile::tempdir;

    fn tinted() -> DocumentPayload {
        let mut doc = DocumentPayload::default();
        doc.background_color
            .insert(PanelId::default(), Fill::solid(Color::rgb(10, 20, 30)));
        doc
    }

    #[test]
    fn test_save_writes_id_json() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested")).unwrap();

        block_on(storage.save("tinted", &tinted())).unwrap();
        assert!(dir.path().join("nested").join("tinted.json").exists());
        assert_eq!(block_on(storage.load("tinted")).unwrap(), tinted());
        assert!(matches!(block_on(storage.load("missing")), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_file_is_a_document_error() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("broken.json"), "{\"shapes\": 3}").unwrap();

        let result = block_on(storage.load("broken"));
        assert!(matches!(result, Err(StorageError::Document { .. })));
    }

    #[test]
    fn test_list_skips_foreign_and_unreadable_files() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        block_on(storage.save("zeta", &tinted())).unwrap();
        block_on(storage.save("alpha", &DocumentPayload::default())).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("broken.json"), "nope").unwrap();

        let ids: Vec<_> = block_on(storage.list()).unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["alpha".to_string(), "zeta".to_string()]);
    }

    #[test]
    fn test_delete_removes_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        block_on(storage.save("tinted", &tinted())).unwrap();
        assert!(block_on(storage.exists("tinted")).unwrap());

        block_on(storage.delete("tinted")).unwrap();
        assert!(!dir.path().join("tinted.json").exists());
        assert!(!block_on(storage.exists("tinted")).unwrap());
        assert!(matches!(block_on(storage.delete("tinted")), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_path_like_ids_are_rejected() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        assert!(matches!(
            block_on(storage.save("../escape", &tinted())),
            Err(StorageError::InvalidId(_))
        ));
        assert!(matches!(block_on(storage.load("a:b")), Err(StorageError::InvalidId(_))));
    }
}
