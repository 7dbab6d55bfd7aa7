use std::ops::Range;

use ropey::Rope;

/// The raw markdown text of an editing session.
///
/// Backed by a rope so bursts of small edits stay cheap even on large
/// documents. Positions are char offsets. Out-of-range positions are
/// clamped here rather than at every call site, so a stale edit event can
/// never panic the session.
#[derive(Debug, Clone)]
pub struct ContentBuffer {
    rope: Rope,
}

impl ContentBuffer {
    /// Create a buffer holding `text`.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// The full text content.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Length in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Insert `text` at a char offset, clamped to the buffer end.
    pub fn insert(&mut self, at: usize, text: &str) {
        let at = at.min(self.rope.len_chars());
        self.rope.insert(at, text);
    }

    /// Remove a char range, clamped to the buffer. Empty ranges are a
    /// no-op.
    pub fn remove(&mut self, range: Range<usize>) {
        let end = range.end.min(self.rope.len_chars());
        let start = range.start.min(end);
        if start < end {
            self.rope.remove(start..end);
        }
    }

    /// Replace the entire content (file import, remote load).
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }
}

impl Default for ContentBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_offset() {
        let mut buffer = ContentBuffer::new("helo");
        buffer.insert(3, "l");
        assert_eq!(buffer.text(), "hello");
    }

    #[test]
    fn test_insert_past_end_is_clamped() {
        let mut buffer = ContentBuffer::new("ab");
        buffer.insert(100, "c");
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn test_remove_range() {
        let mut buffer = ContentBuffer::new("hello world");
        buffer.remove(5..11);
        assert_eq!(buffer.text(), "hello");
    }

    #[test]
    fn test_remove_out_of_range_is_clamped() {
        let mut buffer = ContentBuffer::new("abc");
        buffer.remove(2..50);
        assert_eq!(buffer.text(), "ab");
        buffer.remove(5..9);
        assert_eq!(buffer.text(), "ab");
    }

    #[test]
    fn test_set_text_replaces_everything() {
        let mut buffer = ContentBuffer::new("old content");
        buffer.set_text("new");
        assert_eq!(buffer.text(), "new");
        assert_eq!(buffer.len_chars(), 3);
    }

    #[test]
    fn test_multibyte_chars_use_char_offsets() {
        let mut buffer = ContentBuffer::new("héllo");
        buffer.insert(5, "!");
        assert_eq!(buffer.text(), "héllo!");
        buffer.remove(1..2);
        assert_eq!(buffer.text(), "hllo!");
    }
}
