use crate::document::{self, DEFAULT_NAME};
use crate::render;
use crate::store::StoreError;

use super::buffer::ContentBuffer;

/// Lifecycle of the initial content resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
}

/// Observable editing state, derived from the model's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Initial content not yet resolved.
    Loading,
    /// In-memory content matches the last persisted content.
    Clean,
    /// Unsaved edits exist.
    Dirty,
    /// A content write is in flight.
    Saving,
}

/// Severity of a session notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A user-facing notice surfaced by the session (load errors, save
/// failures). The presentation layer decides how to show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Snapshot of a content write handed to the store.
///
/// Completing the save with the ticket tells the model which revision the
/// write actually carried, so an edit that lands while the write is in
/// flight keeps the session dirty instead of being silently absorbed.
#[derive(Debug, Clone)]
pub struct SaveTicket {
    pub(super) revision: u64,
    /// The content the write carries.
    pub content: String,
}

/// Snapshot of a name write handed to the store.
#[derive(Debug, Clone)]
pub struct NameTicket {
    /// The name the write carries.
    pub name: String,
}

/// The complete editing state for one document.
///
/// All session state lives here - no globals. Mutation happens through
/// [`update`](super::update) and the save lifecycle methods; everything
/// else is read-only accessors.
#[derive(Debug)]
pub struct Model {
    /// Opaque document id; immutable for the session's lifetime.
    pub id: String,
    /// Display name.
    pub name: String,
    pub(super) buffer: ContentBuffer,
    pub(super) load: LoadState,
    /// Bumped on every content mutation.
    pub(super) revision: u64,
    /// Revision last successfully persisted.
    pub(super) saved_revision: u64,
    pub(super) saving: bool,
    pub(super) name_dirty: bool,
    pub(super) name_saving: bool,
    preview_html: String,
    word_count: usize,
    notice: Option<Notice>,
}

impl Model {
    /// Create a model in the `Loading` state for `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: DEFAULT_NAME.to_string(),
            buffer: ContentBuffer::empty(),
            load: LoadState::Loading,
            revision: 0,
            saved_revision: 0,
            saving: false,
            name_dirty: false,
            name_saving: false,
            preview_html: String::new(),
            word_count: 0,
            notice: None,
        }
    }

    /// The derived editing state.
    pub fn state(&self) -> SessionState {
        match self.load {
            LoadState::Loading => SessionState::Loading,
            LoadState::Ready if self.saving => SessionState::Saving,
            LoadState::Ready if self.is_dirty() => SessionState::Dirty,
            LoadState::Ready => SessionState::Clean,
        }
    }

    /// The current raw markdown text.
    pub fn content(&self) -> String {
        self.buffer.text()
    }

    /// The rendered preview fragment, recomputed synchronously on every
    /// content mutation.
    pub fn preview_html(&self) -> &str {
        &self.preview_html
    }

    /// Whitespace-separated word count of the current content.
    pub const fn word_count(&self) -> usize {
        self.word_count
    }

    /// Whether unsaved content edits exist.
    pub const fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// Whether a content write is in flight.
    pub const fn is_saving(&self) -> bool {
        self.saving
    }

    /// Whether the name differs from the last persisted name.
    pub const fn is_name_dirty(&self) -> bool {
        self.name_dirty
    }

    /// Whether a name write is in flight.
    pub const fn is_name_saving(&self) -> bool {
        self.name_saving
    }

    /// The current edit revision.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply resolved initial content and enter `Ready(Clean)`.
    pub(super) fn apply_loaded(&mut self, name: &str, content: &str) {
        self.buffer.set_text(content);
        self.name = name.to_string();
        self.load = LoadState::Ready;
        self.saved_revision = self.revision;
        self.name_dirty = false;
        self.refresh_derived();
    }

    /// Record a content mutation: bump the revision and recompute the
    /// preview and word count. Rendering is never debounced.
    pub(super) fn touch_content(&mut self) {
        self.revision += 1;
        self.refresh_derived();
    }

    fn refresh_derived(&mut self) {
        let text = self.buffer.text();
        self.preview_html = render::to_html(&text);
        self.word_count = document::word_count(&text);
    }

    /// Begin a content write, snapshotting what it will carry.
    pub fn begin_content_save(&mut self) -> SaveTicket {
        self.saving = true;
        SaveTicket {
            revision: self.revision,
            content: self.buffer.text(),
        }
    }

    /// Complete a content write. On success the revision the ticket
    /// carried becomes the saved revision; edits that arrived while the
    /// write was in flight leave the session dirty. On failure nothing is
    /// reverted and the error is surfaced as a notice.
    pub fn complete_content_save(&mut self, ticket: &SaveTicket, result: Result<(), StoreError>) {
        self.saving = false;
        match result {
            Ok(()) => self.saved_revision = ticket.revision,
            Err(err) => {
                self.show_notice(NoticeLevel::Error, format!("Save failed: {err}"));
            }
        }
    }

    /// Begin a name write, snapshotting the name it will carry.
    pub fn begin_name_save(&mut self) -> NameTicket {
        self.name_saving = true;
        NameTicket {
            name: self.name.clone(),
        }
    }

    /// Complete a name write. The name stays dirty if it changed again
    /// while the write was in flight.
    pub fn complete_name_save(&mut self, ticket: &NameTicket, result: Result<(), StoreError>) {
        self.name_saving = false;
        match result {
            Ok(()) => {
                if self.name == ticket.name {
                    self.name_dirty = false;
                }
            }
            Err(err) => {
                self.show_notice(NoticeLevel::Error, format!("Rename failed: {err}"));
            }
        }
    }

    pub(super) fn show_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            message: message.into(),
        });
    }

    /// The current notice, if any, without consuming it.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Take the current notice, clearing it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

// Default enables std::mem::take in the update driver.
impl Default for Model {
    fn default() -> Self {
        Self::new(String::new())
    }
}
