//! Document records and shared document helpers.

use serde::{Deserialize, Serialize};

/// Name given to a document that has never been renamed.
pub const DEFAULT_NAME: &str = "Untitled.md";

/// Seed content for a newly created document record.
pub const DEFAULT_CONTENT: &str = "Start writing";

/// A persisted markdown document, owned by zero or one user.
///
/// This mirrors the record schema of the backing store. `content` is
/// always a defined string (empty, never absent), and `id` is immutable
/// once an editing session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Opaque string key.
    pub id: String,
    /// Owning user, absent for anonymous/local documents.
    pub owner_id: Option<String>,
    /// Display name.
    pub name: String,
    /// Raw markdown text.
    pub content: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at_ms: u64,
    /// Last write time, milliseconds since the Unix epoch.
    pub updated_at_ms: u64,
}

/// Returns true if the file name carries a markdown extension.
pub fn is_markdown_name(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown")
    })
}

/// Whitespace-separated word count shown in the editor status line.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
