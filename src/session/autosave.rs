//! Autosave debouncing.
//!
//! One slot per persisted field: a new edit replaces the pending entry,
//! and the slot fires once its quiet period elapses with no replacement.
//! Content and name run on independent slots so one field's edits never
//! delay the other's save. Timing is driven by a millisecond clock the
//! session driver supplies, which keeps every transition testable without
//! sleeping.

/// Quiet period before a content write fires.
pub const CONTENT_DELAY_MS: u64 = 2000;

/// Quiet period before a name write fires.
pub const NAME_DELAY_MS: u64 = 1000;

/// Debounce slot for content writes. Queues the edit revision the write
/// will cover.
#[derive(Debug)]
pub struct ContentDebouncer {
    delay_ms: u64,
    pending: Option<(u64, u64)>,
}

impl ContentDebouncer {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Schedule a write for `revision`, replacing any not-yet-fired slot.
    pub const fn queue(&mut self, revision: u64, now_ms: u64) {
        self.pending = Some((revision, now_ms));
    }

    /// Consume and return the queued revision once the quiet period has
    /// elapsed.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<u64> {
        let (revision, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some(revision)
        } else {
            None
        }
    }

    pub const fn cancel(&mut self) {
        self.pending = None;
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Debounce slot for name writes. Queues the name the write will carry.
#[derive(Debug)]
pub struct NameDebouncer {
    delay_ms: u64,
    pending: Option<(String, u64)>,
}

impl NameDebouncer {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Schedule a write of `name`, replacing any not-yet-fired slot.
    pub fn queue(&mut self, name: String, now_ms: u64) {
        self.pending = Some((name, now_ms));
    }

    /// Consume and return the queued name once the quiet period has
    /// elapsed.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<String> {
        let (_, queued_at) = self.pending.as_ref()?;
        if now_ms.saturating_sub(*queued_at) >= self.delay_ms {
            self.pending.take().map(|(name, _)| name)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_slot_fires_after_quiet_period() {
        let mut debouncer = ContentDebouncer::new(CONTENT_DELAY_MS);
        debouncer.queue(1, 0);

        assert_eq!(debouncer.take_ready(1999), None);
        assert_eq!(debouncer.take_ready(2000), Some(1));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_burst_of_edits_coalesces_to_one_fire() {
        let mut debouncer = ContentDebouncer::new(CONTENT_DELAY_MS);
        debouncer.queue(1, 0);
        debouncer.queue(2, 500);
        debouncer.queue(3, 900);

        // The quiet period restarts from the last edit.
        assert_eq!(debouncer.take_ready(2100), None);
        assert_eq!(debouncer.take_ready(2900), Some(3));
        assert_eq!(debouncer.take_ready(10_000), None);
    }

    #[test]
    fn test_edit_after_fire_rearms_the_slot() {
        let mut debouncer = ContentDebouncer::new(CONTENT_DELAY_MS);
        debouncer.queue(1, 0);
        assert_eq!(debouncer.take_ready(2000), Some(1));

        debouncer.queue(2, 3000);
        assert_eq!(debouncer.take_ready(4999), None);
        assert_eq!(debouncer.take_ready(5000), Some(2));
    }

    #[test]
    fn test_cancel_discards_pending_write() {
        let mut debouncer = ContentDebouncer::new(CONTENT_DELAY_MS);
        debouncer.queue(1, 0);
        debouncer.cancel();
        assert_eq!(debouncer.take_ready(10_000), None);
    }

    #[test]
    fn test_name_slot_carries_latest_name() {
        let mut debouncer = NameDebouncer::new(NAME_DELAY_MS);
        debouncer.queue("a.md".to_string(), 0);
        debouncer.queue("ab.md".to_string(), 400);

        assert_eq!(debouncer.take_ready(1300), None);
        assert_eq!(debouncer.take_ready(1400), Some("ab.md".to_string()));
    }

    #[test]
    fn test_name_fires_before_content_for_simultaneous_edits() {
        let mut content = ContentDebouncer::new(CONTENT_DELAY_MS);
        let mut name = NameDebouncer::new(NAME_DELAY_MS);
        content.queue(1, 0);
        name.queue("a.md".to_string(), 0);

        assert_eq!(name.take_ready(1000), Some("a.md".to_string()));
        assert_eq!(content.take_ready(1000), None);
        assert_eq!(content.take_ready(2000), Some(1));
    }
}
