use std::ops::Range;

use crate::document::DEFAULT_NAME;

use super::model::{Model, NoticeLevel};

/// Events the editor session reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Initial content resolved (fetch, create, or anonymous default).
    Loaded { name: String, content: String },
    /// Initial fetch failed; the session opens empty with the error
    /// surfaced.
    LoadFailed(String),
    /// Insert text at a char offset.
    Insert { at: usize, text: String },
    /// Delete a char range.
    Delete { range: Range<usize> },
    /// Replace the entire content (completed file import).
    Replace(String),
    /// Change the document display name.
    Rename(String),
    /// Manual save. No pure state change; the driver cancels the pending
    /// debounce slot and writes immediately.
    SaveRequested,
}

/// Pure state transition function.
///
/// Side effects - debounce scheduling, store writes, file reads - live on
/// [`Session`](super::Session); this function only moves the model. The
/// preview and word count recompute synchronously inside the content
/// transitions, since only persistence is ever debounced.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::Loaded { name, content } => {
            model.apply_loaded(&name, &content);
        }
        Message::LoadFailed(err) => {
            model.apply_loaded(DEFAULT_NAME, "");
            model.show_notice(NoticeLevel::Error, format!("Load failed: {err}"));
        }
        Message::Insert { at, text } => {
            if !text.is_empty() {
                model.buffer.insert(at, &text);
                model.touch_content();
            }
        }
        Message::Delete { range } => {
            if range.start < range.end {
                model.buffer.remove(range);
                model.touch_content();
            }
        }
        Message::Replace(content) => {
            // Destructive by contract: an import discards unsaved edits.
            model.buffer.set_text(&content);
            model.touch_content();
        }
        Message::Rename(name) => {
            if name != model.name {
                model.name = name;
                model.name_dirty = true;
            }
        }
        // Write scheduling is the driver's job.
        Message::SaveRequested => {}
    }
    model
}
