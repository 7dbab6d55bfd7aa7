//! JSON-file document store for the command-line bridge.
//!
//! The whole store is a single JSON document, read once on open and
//! rewritten after every mutation. A flat file is plenty for one local
//! user; anything bigger belongs behind a real backend implementing
//! [`DocumentStore`](super::DocumentStore).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::document::DocumentRecord;

use super::{DocumentStore, StoreError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    documents: Vec<DocumentRecord>,
}

#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    data: StoreFile,
}

impl LocalStore {
    /// Open the store at `path`, treating a missing file as empty.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or decoded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            StoreFile::default()
        };
        Ok(Self { path, data })
    }

    /// Where the store persists its records.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.data.documents.iter().position(|record| record.id == id)
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }
}

impl DocumentStore for LocalStore {
    fn fetch(&mut self, id: &str, owner_id: &str) -> Result<Option<DocumentRecord>, StoreError> {
        Ok(self
            .data
            .documents
            .iter()
            .find(|record| record.id == id && record.owner_id.as_deref() == Some(owner_id))
            .cloned())
    }

    fn create(
        &mut self,
        id: &str,
        owner_id: &str,
        name: &str,
        content: &str,
    ) -> Result<DocumentRecord, StoreError> {
        let now = Self::now_ms();
        let record = DocumentRecord {
            id: id.to_string(),
            owner_id: Some(owner_id.to_string()),
            name: name.to_string(),
            content: content.to_string(),
            created_at_ms: now,
            updated_at_ms: now,
        };
        match self.position(id) {
            Some(idx) => self.data.documents[idx] = record.clone(),
            None => self.data.documents.push(record.clone()),
        }
        self.flush()?;
        Ok(record)
    }

    fn update_content(&mut self, id: &str, content: &str) -> Result<(), StoreError> {
        if let Some(idx) = self.position(id) {
            self.data.documents[idx].content = content.to_string();
            self.data.documents[idx].updated_at_ms = Self::now_ms();
            self.flush()?;
        }
        Ok(())
    }

    fn rename(&mut self, id: &str, name: &str) -> Result<(), StoreError> {
        if let Some(idx) = self.position(id) {
            self.data.documents[idx].name = name.to_string();
            self.data.documents[idx].updated_at_ms = Self::now_ms();
            self.flush()?;
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        if let Some(idx) = self.position(id) {
            self.data.documents.remove(idx);
            self.flush()?;
        }
        Ok(())
    }

    fn list(&mut self, owner_id: &str) -> Result<Vec<DocumentRecord>, StoreError> {
        Ok(self
            .data
            .documents
            .iter()
            .filter(|record| record.owner_id.as_deref() == Some(owner_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let mut store = LocalStore::open(dir.path().join("store.json")).unwrap();
        assert!(store.fetch("d1", "u1").unwrap().is_none());
    }

    #[test]
    fn test_create_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = LocalStore::open(&path).unwrap();
        store.create("d1", "u1", "notes.md", "hello").unwrap();
        drop(store);

        let mut reopened = LocalStore::open(&path).unwrap();
        let record = reopened.fetch("d1", "u1").unwrap().unwrap();
        assert_eq!(record.name, "notes.md");
        assert_eq!(record.content, "hello");
    }

    #[test]
    fn test_update_content_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = LocalStore::open(&path).unwrap();
        store.create("d1", "u1", "notes.md", "old").unwrap();
        store.update_content("d1", "new").unwrap();
        drop(store);

        let mut reopened = LocalStore::open(&path).unwrap();
        let record = reopened.fetch("d1", "u1").unwrap().unwrap();
        assert_eq!(record.content, "new");
    }

    #[test]
    fn test_delete_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = LocalStore::open(&path).unwrap();
        store.create("d1", "u1", "notes.md", "x").unwrap();
        store.delete("d1").unwrap();
        drop(store);

        let mut reopened = LocalStore::open(&path).unwrap();
        assert!(reopened.fetch("d1", "u1").unwrap().is_none());
    }

    #[test]
    fn test_creates_parent_directories_on_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("store.json");

        let mut store = LocalStore::open(&path).unwrap();
        store.create("d1", "u1", "notes.md", "x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        assert!(LocalStore::open(&path).is_err());
    }

    #[test]
    fn test_list_filters_by_owner() {
        let dir = tempdir().unwrap();
        let mut store = LocalStore::open(dir.path().join("store.json")).unwrap();
        store.create("d1", "u1", "a.md", "x").unwrap();
        store.create("d2", "u2", "b.md", "y").unwrap();

        let listed = store.list("u1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "d1");
    }
}
