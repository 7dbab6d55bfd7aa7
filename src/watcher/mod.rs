//! File watching for the editing bridge.
//!
//! Watches the imported markdown file so external edits flow into the
//! session as content changes. Notifications are debounced: editors save
//! in bursts (truncate, write, rename), and one change per burst is
//! enough to re-import the file.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

/// Watches a single file and reports debounced change notifications.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    root: PathBuf,
    target: PathBuf,
    debounce: Duration,
    pending_since: Option<Instant>,
}

impl FileWatcher {
    /// Watch `path`, reporting a change once `debounce` has elapsed with
    /// no further events.
    ///
    /// The watch is placed on the parent directory: many editors replace
    /// the file on save, which silently drops inode-level watches on some
    /// platforms. The path is canonicalized so OS-reported event paths
    /// match.
    ///
    /// # Errors
    /// Returns an error if the watch cannot be established.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        let target = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let root = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&root, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
            root,
            target,
            debounce,
            pending_since: None,
        })
    }

    /// The canonical path being watched.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Drain pending events; returns true once a debounced change is due.
    pub fn take_change_ready(&mut self) -> bool {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) if self.is_relevant(&ev) => {
                    self.pending_since = Some(Instant::now());
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(error = %err, "watch event error");
                }
            }
        }

        match self.pending_since {
            Some(since) if since.elapsed() >= self.debounce => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }

    // Some backends report directory-level paths for file changes, so a
    // match on the watch root or a bare file-name match both count.
    fn is_relevant(&self, event: &Event) -> bool {
        let target_name = self.target.file_name();
        event.paths.iter().any(|path| {
            path == &self.target
                || path == &self.root
                || (target_name.is_some() && path.file_name() == target_name)
        })
    }
}
