//! Document source adapter.
//!
//! Resolves the initial content of an editing session - remote record,
//! created-on-miss record, or the anonymous empty default - and owns the
//! file import/export boundary.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::document::{self, DEFAULT_CONTENT, DEFAULT_NAME};
use crate::store::{DocumentStore, Identity, StoreError};

/// File name used when exporting the current content.
pub const EXPORT_FILE_NAME: &str = "document.md";

/// Resolve the initial `(name, content)` for a session on `id`.
///
/// Anonymous sessions start empty with the placeholder name and never
/// touch the store. For a signed-in user the record is fetched, or
/// created with the default seed when the id has never been saved.
///
/// # Errors
/// Returns an error if the fetch or create fails; the caller surfaces it
/// and opens the session with empty content.
pub fn resolve_initial<S: DocumentStore>(
    store: &mut S,
    id: &str,
    identity: Option<&Identity>,
) -> Result<(String, String), StoreError> {
    let Some(identity) = identity else {
        return Ok((DEFAULT_NAME.to_string(), String::new()));
    };
    if let Some(record) = store.fetch(id, &identity.user_id)? {
        return Ok((record.name, record.content));
    }
    let record = store.create(id, &identity.user_id, DEFAULT_NAME, DEFAULT_CONTENT)?;
    Ok((record.name, record.content))
}

/// Whether a dropped file is accepted for import.
///
/// The drop path takes only markdown names; the picker path trusts any
/// selection and reads it as text.
pub fn accepts_drop(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .is_some_and(|name| document::is_markdown_name(&name))
}

/// Read an imported file as UTF-8 text.
///
/// # Errors
/// Returns an error if the file is unreadable or not valid UTF-8; the
/// caller leaves the session content untouched.
pub fn read_import(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

/// Write `content` to `document.md` under `dir`, returning the path.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn export_markdown(content: &str, dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, content)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tempfile::tempdir;

    #[test]
    fn test_anonymous_resolution_never_calls_the_store() {
        let mut store = MemoryStore::new();
        let (name, content) = resolve_initial(&mut store, "abc", None).unwrap();

        assert_eq!(name, DEFAULT_NAME);
        assert_eq!(content, "");
        assert_eq!(store.calls().fetch, 0);
        assert_eq!(store.calls().create, 0);
    }

    #[test]
    fn test_missing_record_is_created_with_seed_content() {
        let mut store = MemoryStore::new();
        let identity = Identity::new("u1");
        let (name, content) = resolve_initial(&mut store, "abc", Some(&identity)).unwrap();

        assert_eq!(name, "Untitled.md");
        assert_eq!(content, "Start writing");
        assert_eq!(store.calls().fetch, 1);
        assert_eq!(store.calls().create, 1);
        assert!(store.record("abc").is_some());
    }

    #[test]
    fn test_existing_record_is_returned_without_create() {
        let mut store = MemoryStore::new();
        store.create("abc", "u1", "plan.md", "# Plan").unwrap();

        let identity = Identity::new("u1");
        let (name, content) = resolve_initial(&mut store, "abc", Some(&identity)).unwrap();

        assert_eq!(name, "plan.md");
        assert_eq!(content, "# Plan");
        assert_eq!(store.calls().create, 1); // only the setup create
    }

    #[test]
    fn test_fetch_failure_propagates() {
        let mut store = MemoryStore::new();
        store.fail_next("backend down");

        let identity = Identity::new("u1");
        let err = resolve_initial(&mut store, "abc", Some(&identity)).unwrap_err();
        assert!(err.to_string().contains("backend down"));
    }

    #[test]
    fn test_accepts_drop_only_for_markdown_names() {
        assert!(accepts_drop(Path::new("/tmp/notes.md")));
        assert!(accepts_drop(Path::new("notes.markdown")));
        assert!(!accepts_drop(Path::new("/tmp/notes.txt")));
        assert!(!accepts_drop(Path::new("notes")));
    }

    #[test]
    fn test_read_import_rejects_non_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.md");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        assert!(read_import(&path).is_err());
    }

    #[test]
    fn test_export_writes_document_md() {
        let dir = tempdir().unwrap();
        let path = export_markdown("# Exported", dir.path()).unwrap();

        assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
        assert_eq!(fs::read_to_string(path).unwrap(), "# Exported");
    }
}
