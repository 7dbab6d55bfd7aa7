//! Persistence and identity interfaces.
//!
//! The editor core does not own a backend. Documents live behind
//! [`DocumentStore`] and identity behind [`AuthProvider`]; the session
//! only ever calls these traits. [`MemoryStore`] backs tests and
//! short-lived sessions, [`LocalStore`] persists to a JSON file for the
//! command-line bridge.

mod local;
mod memory;

pub use local::LocalStore;
pub use memory::{CallCounts, MemoryStore};

use serde::{Deserialize, Serialize};

use crate::document::DocumentRecord;

/// An authenticated user identity attached to an editing session.
///
/// Always passed explicitly - the session never reads ambient global
/// state to discover who is editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque user key, matching `owner_id` on document records.
    pub user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Errors from the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing service rejected or failed the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Reading or writing the store's backing file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The store's backing data could not be decoded.
    #[error("malformed store data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Resolves the current authenticated identity, if any.
pub trait AuthProvider {
    /// The identity of the signed-in user, or `None` for anonymous use.
    ///
    /// # Errors
    /// Returns an error if the identity lookup itself fails.
    fn current_user(&self) -> Result<Option<Identity>, StoreError>;
}

/// A fixed identity source for local and test use.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    identity: Option<Identity>,
}

impl StaticAuth {
    /// An auth provider that always reports `user_id` as signed in.
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            identity: Some(Identity::new(user_id)),
        }
    }

    /// An auth provider with nobody signed in.
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }
}

impl AuthProvider for StaticAuth {
    fn current_user(&self) -> Result<Option<Identity>, StoreError> {
        Ok(self.identity.clone())
    }
}

/// Document persistence operations the editor core depends on.
///
/// Writes are last-write-wins per field; the store applies no versioning
/// or request sequencing. Updating an id that has no record is a silent
/// no-op, matching the row-filter semantics of the original backend.
pub trait DocumentStore {
    /// Look up the record for `(id, owner_id)`. `None` when the id has
    /// never been saved for this owner.
    ///
    /// # Errors
    /// Returns an error if the lookup fails.
    fn fetch(&mut self, id: &str, owner_id: &str) -> Result<Option<DocumentRecord>, StoreError>;

    /// Create a record with the given seed name and content.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    fn create(
        &mut self,
        id: &str,
        owner_id: &str,
        name: &str,
        content: &str,
    ) -> Result<DocumentRecord, StoreError>;

    /// Overwrite the content field of `id`.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    fn update_content(&mut self, id: &str, content: &str) -> Result<(), StoreError>;

    /// Overwrite the name field of `id`.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    fn rename(&mut self, id: &str, name: &str) -> Result<(), StoreError>;

    /// Remove the record for `id`. Invoked by the surrounding tooling,
    /// never by the editor session itself.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;

    /// All records owned by `owner_id`.
    ///
    /// # Errors
    /// Returns an error if the lookup fails.
    fn list(&mut self, owner_id: &str) -> Result<Vec<DocumentRecord>, StoreError>;
}
