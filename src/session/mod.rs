//! The editor session.
//!
//! One session edits one document id. The design is TEA-shaped:
//! - [`Model`]: the complete editing state
//! - [`Message`]: every event the session reacts to
//! - [`update`]: pure state transitions
//! - [`Session`]: the driver that owns the store handle, schedules the
//!   autosave debouncers, and performs the writes
//!
//! Everything is single-threaded and event-driven: the caller supplies a
//! millisecond clock to [`Session::handle`] and polls [`Session::tick`],
//! so every ordering rule is testable without sleeping.

mod autosave;
mod buffer;
mod model;
mod update;

pub use autosave::{CONTENT_DELAY_MS, ContentDebouncer, NAME_DELAY_MS, NameDebouncer};
pub use buffer::ContentBuffer;
pub use model::{Model, NameTicket, Notice, NoticeLevel, SaveTicket, SessionState};
pub use update::{Message, update};

use std::io;
use std::path::{Path, PathBuf};

use crate::source;
use crate::store::{DocumentStore, Identity};

/// An editing session for one document, coordinating the model, the
/// per-field autosave debouncers, and the persistence writes.
pub struct Session<S> {
    model: Model,
    store: S,
    identity: Option<Identity>,
    content_debounce: ContentDebouncer,
    name_debounce: NameDebouncer,
}

impl<S: DocumentStore> Session<S> {
    /// Open a session for `id`, resolving initial content through the
    /// source adapter.
    ///
    /// A fetch failure does not abort the session: it opens with empty
    /// content and the error surfaced as a notice, so the failure is
    /// never silently lost.
    pub fn open(store: S, identity: Option<Identity>, id: impl Into<String>) -> Self {
        let id = id.into();
        let mut session = Self {
            model: Model::new(&id),
            store,
            identity,
            content_debounce: ContentDebouncer::new(CONTENT_DELAY_MS),
            name_debounce: NameDebouncer::new(NAME_DELAY_MS),
        };
        let msg = match source::resolve_initial(&mut session.store, &id, session.identity.as_ref())
        {
            Ok((name, content)) => Message::Loaded { name, content },
            Err(err) => Message::LoadFailed(err.to_string()),
        };
        session.model = update(std::mem::take(&mut session.model), msg);
        session
    }

    pub const fn model(&self) -> &Model {
        &self.model
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Take the model's current notice, clearing it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.model.take_notice()
    }

    /// Apply a freshly resolved identity. Identity is always explicit -
    /// callers re-fetch it from their auth provider and pass it in; the
    /// session never reads ambient state.
    pub fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity;
    }

    /// Handle one event at `now_ms`, scheduling autosave work as needed.
    pub fn handle(&mut self, msg: Message, now_ms: u64) {
        let manual_save = matches!(msg, Message::SaveRequested);
        let revision_before = self.model.revision();
        let name_before = self.model.name.clone();

        self.model = update(std::mem::take(&mut self.model), msg);

        if self.model.revision() != revision_before {
            // A new edit replaces any not-yet-fired slot; an in-flight
            // write is left alone.
            self.content_debounce.queue(self.model.revision(), now_ms);
        }
        if self.model.name != name_before {
            self.name_debounce.queue(self.model.name.clone(), now_ms);
        }
        if manual_save {
            self.save_now();
        }
    }

    /// Import a file picked through the file dialog. Content is trusted
    /// as text regardless of extension. A read failure leaves the current
    /// content untouched.
    pub fn import_picked(&mut self, path: &Path, now_ms: u64) {
        match source::read_import(path) {
            Ok(content) => self.handle(Message::Replace(content), now_ms),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "import read failed");
            }
        }
    }

    /// Import a dropped file. Only `.md`/`.markdown` names are accepted
    /// on this path; anything else is ignored.
    pub fn import_dropped(&mut self, path: &Path, now_ms: u64) {
        if !source::accepts_drop(path) {
            tracing::debug!(path = %path.display(), "drop rejected: not a markdown file");
            return;
        }
        self.import_picked(path, now_ms);
    }

    /// Poll the autosave debouncers at `now_ms`, issuing any write whose
    /// quiet period has elapsed.
    pub fn tick(&mut self, now_ms: u64) {
        // A ready slot is left queued while a write for its field is in
        // flight; it fires on the first tick after completion.
        if !self.model.is_saving() && self.content_debounce.take_ready(now_ms).is_some() {
            self.persist_content();
        }
        if !self.model.is_name_saving() && self.name_debounce.take_ready(now_ms).is_some() {
            self.persist_name();
        }
    }

    /// Save immediately, short-circuiting the debounce. A queued name
    /// write is flushed at the same time.
    pub fn save_now(&mut self) {
        self.content_debounce.cancel();
        self.persist_content();
        if self.name_debounce.is_pending() {
            self.name_debounce.cancel();
            self.persist_name();
        }
    }

    /// Whether either field has a write queued but not yet fired.
    pub const fn has_pending_autosave(&self) -> bool {
        self.content_debounce.is_pending() || self.name_debounce.is_pending()
    }

    /// Tear down the session: cancel pending autosave slots so no write
    /// fires against a session the user has left. Required before
    /// dropping a session that may still have work queued.
    pub fn close(&mut self) {
        self.content_debounce.cancel();
        self.name_debounce.cancel();
        tracing::debug!(id = %self.model.id, "session closed");
    }

    /// Write the current content to `document.md` under `dir`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn export_to(&self, dir: &Path) -> io::Result<PathBuf> {
        source::export_markdown(&self.model.content(), dir)
    }

    fn persist_content(&mut self) {
        if self.identity.is_none() {
            // Anonymous editing is a supported state: render and edit,
            // never persist.
            tracing::debug!(id = %self.model.id, "content save skipped without identity");
            return;
        }
        let ticket = self.model.begin_content_save();
        let result = self.store.update_content(&self.model.id, &ticket.content);
        if let Err(err) = &result {
            tracing::warn!(id = %self.model.id, error = %err, "content save failed");
        }
        self.model.complete_content_save(&ticket, result);
    }

    fn persist_name(&mut self) {
        if self.identity.is_none() {
            tracing::debug!(id = %self.model.id, "name save skipped without identity");
            return;
        }
        let ticket = self.model.begin_name_save();
        let result = self.store.rename(&self.model.id, &ticket.name);
        if let Err(err) = &result {
            tracing::warn!(id = %self.model.id, error = %err, "name save failed");
        }
        self.model.complete_name_save(&ticket, result);
    }
}
