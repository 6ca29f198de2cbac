//! Debounced change detection for a single markdown file.
//!
//! Uses the notify crate for cross-platform file system events. The parent
//! directory is watched because editors often save by replacing the file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Default quiet period before a change is reported.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Watches one file and reports debounced changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    target_path: PathBuf,
    target_name: Option<OsString>,
    debounce: Duration,
    pending_since: Option<Instant>,
}

impl FileWatcher {
    /// Start watching `path`.
    ///
    /// # Errors
    /// Returns an error if the watcher cannot be created or the directory
    /// cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // OS event paths are canonical, so compare against the canonical form.
        let target_path = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let target_name = target_path.file_name().map(std::ffi::OsStr::to_os_string);
        let watch_root = target_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;
        tracing::debug!(file = %target_path.display(), root = %watch_root.display(), "watching");

        Ok(Self {
            _watcher: watcher,
            rx,
            target_path,
            target_name,
            debounce,
            pending_since: None,
        })
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Drain pending events; returns true once a change has settled.
    pub fn take_change_ready(&mut self) -> bool {
        let mut relevant = 0u32;
        let mut total = 0u32;
        while let Ok(event) = self.rx.try_recv() {
            total += 1;
            match event {
                Ok(ev) if self.is_relevant(&ev) => relevant += 1,
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "file watcher error");
                    crate::perf::log_event(
                        crate::perf::DebugEvent::WatchError,
                        format!("{err}"),
                    );
                }
            }
        }
        if total > 0 {
            crate::perf::log_event(
                crate::perf::DebugEvent::WatchPoll,
                format!(
                    "total={total} relevant={relevant} target={}",
                    self.target_path.display()
                ),
            );
        }
        if relevant > 0 {
            self.pending_since = Some(Instant::now());
        }

        match self.pending_since {
            Some(since) if since.elapsed() >= self.debounce => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }

    fn is_relevant(&self, event: &Event) -> bool {
        if matches!(event.kind, EventKind::Access(_)) {
            return false;
        }
        event.paths.iter().any(|path| {
            path == &self.target_path
                || self
                    .target_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("target_path", &self.target_path)
            .field("debounce", &self.debounce)
            .field("pending", &self.pending_since.is_some())
            .finish_non_exhaustive()
    }
}
