//! In-memory document store.
//!
//! Deterministic stand-in for the remote backend: a logical clock instead
//! of wall time, per-operation call counters, and one-shot failure
//! injection so tests can assert exactly which remote operations a
//! scenario performed and how the session reacts when one fails.

use std::collections::BTreeMap;

use crate::document::DocumentRecord;

use super::{DocumentStore, StoreError};

/// How many times each store operation has been invoked.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub fetch: usize,
    pub create: usize,
    pub update_content: usize,
    pub rename: usize,
    pub delete: usize,
    pub list: usize,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, DocumentRecord>,
    calls: CallCounts,
    clock_ms: u64,
    fail_next: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for every operation performed so far.
    pub const fn calls(&self) -> CallCounts {
        self.calls
    }

    /// Make the next store operation fail with `message`, then recover.
    pub fn fail_next(&mut self, message: impl Into<String>) {
        self.fail_next = Some(message.into());
    }

    /// Direct access to a stored record, bypassing the call counters.
    pub fn record(&self, id: &str) -> Option<&DocumentRecord> {
        self.records.get(id)
    }

    fn check_failure(&mut self) -> Result<(), StoreError> {
        match self.fail_next.take() {
            Some(message) => Err(StoreError::Unavailable(message)),
            None => Ok(()),
        }
    }

    // Logical clock: strictly increasing, so updated_at ordering is
    // observable without real time.
    const fn now_ms(&mut self) -> u64 {
        self.clock_ms += 1;
        self.clock_ms
    }
}

impl DocumentStore for MemoryStore {
    fn fetch(&mut self, id: &str, owner_id: &str) -> Result<Option<DocumentRecord>, StoreError> {
        self.calls.fetch += 1;
        self.check_failure()?;
        Ok(self
            .records
            .get(id)
            .filter(|record| record.owner_id.as_deref() == Some(owner_id))
            .cloned())
    }

    fn create(
        &mut self,
        id: &str,
        owner_id: &str,
        name: &str,
        content: &str,
    ) -> Result<DocumentRecord, StoreError> {
        self.calls.create += 1;
        self.check_failure()?;
        let now = self.now_ms();
        let record = DocumentRecord {
            id: id.to_string(),
            owner_id: Some(owner_id.to_string()),
            name: name.to_string(),
            content: content.to_string(),
            created_at_ms: now,
            updated_at_ms: now,
        };
        self.records.insert(id.to_string(), record.clone());
        Ok(record)
    }

    fn update_content(&mut self, id: &str, content: &str) -> Result<(), StoreError> {
        self.calls.update_content += 1;
        self.check_failure()?;
        let now = self.now_ms();
        if let Some(record) = self.records.get_mut(id) {
            record.content = content.to_string();
            record.updated_at_ms = now;
        }
        Ok(())
    }

    fn rename(&mut self, id: &str, name: &str) -> Result<(), StoreError> {
        self.calls.rename += 1;
        self.check_failure()?;
        let now = self.now_ms();
        if let Some(record) = self.records.get_mut(id) {
            record.name = name.to_string();
            record.updated_at_ms = now;
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.calls.delete += 1;
        self.check_failure()?;
        self.records.remove(id);
        Ok(())
    }

    fn list(&mut self, owner_id: &str) -> Result<Vec<DocumentRecord>, StoreError> {
        self.calls.list += 1;
        self.check_failure()?;
        Ok(self
            .records
            .values()
            .filter(|record| record.owner_id.as_deref() == Some(owner_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_then_fetch_roundtrip() {
        let mut store = MemoryStore::new();
        store.create("d1", "u1", "Untitled.md", "Start writing").unwrap();

        let record = store.fetch("d1", "u1").unwrap().unwrap();
        assert_eq!(record.name, "Untitled.md");
        assert_eq!(record.content, "Start writing");
        assert_eq!(record.owner_id.as_deref(), Some("u1"));
    }

    #[test]
    fn test_fetch_filters_by_owner() {
        let mut store = MemoryStore::new();
        store.create("d1", "u1", "a.md", "x").unwrap();

        assert!(store.fetch("d1", "u2").unwrap().is_none());
    }

    #[test]
    fn test_update_content_bumps_updated_at() {
        let mut store = MemoryStore::new();
        let created = store.create("d1", "u1", "a.md", "x").unwrap();
        store.update_content("d1", "y").unwrap();

        let record = store.record("d1").unwrap();
        assert_eq!(record.content, "y");
        assert!(record.updated_at_ms > created.updated_at_ms);
    }

    #[test]
    fn test_update_missing_id_is_a_noop() {
        let mut store = MemoryStore::new();
        store.update_content("ghost", "y").unwrap();
        store.rename("ghost", "z.md").unwrap();
        assert!(store.record("ghost").is_none());
    }

    #[test]
    fn test_rename_changes_name_only() {
        let mut store = MemoryStore::new();
        store.create("d1", "u1", "a.md", "body").unwrap();
        store.rename("d1", "b.md").unwrap();

        let record = store.record("d1").unwrap();
        assert_eq!(record.name, "b.md");
        assert_eq!(record.content, "body");
    }

    #[test]
    fn test_delete_removes_record() {
        let mut store = MemoryStore::new();
        store.create("d1", "u1", "a.md", "x").unwrap();
        store.delete("d1").unwrap();
        assert!(store.fetch("d1", "u1").unwrap().is_none());
    }

    #[test]
    fn test_list_returns_only_owned_records() {
        let mut store = MemoryStore::new();
        store.create("d1", "u1", "a.md", "x").unwrap();
        store.create("d2", "u2", "b.md", "y").unwrap();
        store.create("d3", "u1", "c.md", "z").unwrap();

        let listed = store.list("u1").unwrap();
        let ids: Vec<_> = listed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d3"]);
    }

    #[test]
    fn test_fail_next_errors_once_then_recovers() {
        let mut store = MemoryStore::new();
        store.fail_next("backend down");

        let err = store.fetch("d1", "u1").unwrap_err();
        assert!(err.to_string().contains("backend down"));
        assert!(store.fetch("d1", "u1").is_ok());
    }

    #[test]
    fn test_calls_track_every_operation() {
        let mut store = MemoryStore::new();
        store.create("d1", "u1", "a.md", "x").unwrap();
        store.fetch("d1", "u1").unwrap();
        store.update_content("d1", "y").unwrap();
        store.list("u1").unwrap();

        let calls = store.calls();
        assert_eq!(calls.create, 1);
        assert_eq!(calls.fetch, 1);
        assert_eq!(calls.update_content, 1);
        assert_eq!(calls.list, 1);
        assert_eq!(calls.delete, 0);
    }
}
