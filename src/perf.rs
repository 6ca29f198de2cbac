//! Timing scopes and the opt-in debug log.
//!
//! Scopes print to stderr when `--perf` is on. The debug log records the
//! editor pipeline as [`DebugEvent`]s: file opens, conversions, failed
//! notifications, watcher activity and closed timing scopes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard};
use std::time::Instant;

/// Environment variable naming a debug log path when no flag is given.
pub const DEBUG_LOG_ENV: &str = "LEAF_RENDER_DEBUG_LOG";

static TIMING: AtomicBool = AtomicBool::new(false);
static DEBUG_LOG: LazyLock<Mutex<DebugLog>> = LazyLock::new(|| Mutex::new(DebugLog::new()));

/// One kind of debug log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugEvent {
    /// The terminal host loaded its file.
    AppStart,
    /// A markdown conversion finished.
    Parse,
    /// A fan-out where at least one listener failed.
    NotifyFailure,
    /// The watcher drained a batch of filesystem events.
    WatchPoll,
    WatchError,
    /// A timing scope closed.
    Timing,
}

impl DebugEvent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AppStart => "app.start",
            Self::Parse => "parser.parse",
            Self::NotifyFailure => "editor.notify_failed",
            Self::WatchPoll => "watcher.poll",
            Self::WatchError => "watcher.error",
            Self::Timing => "timing",
        }
    }
}

/// Reports its lifetime on drop: to stderr with `--perf`, and to the
/// debug log when one is open.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        if timing_enabled() {
            eprintln!("[perf] {}: {elapsed_ms:.2} ms", self.name);
        }
        log_event(DebugEvent::Timing, format!("{} {elapsed_ms:.3} ms", self.name));
    }
}

#[derive(Debug)]
struct DebugLog {
    start: Instant,
    writer: Option<BufWriter<File>>,
    written: usize,
}

impl DebugLog {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            writer: None,
            written: 0,
        }
    }
}

fn debug_log() -> MutexGuard<'static, DebugLog> {
    // A panic mid-write leaves only a partial line behind.
    DEBUG_LOG
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

pub fn set_enabled(enabled: bool) {
    TIMING.store(enabled, Ordering::Relaxed);
}

fn timing_enabled() -> bool {
    TIMING.load(Ordering::Relaxed)
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Start writing the debug log to `path`, or stop with `None`.
///
/// Closing appends a summary line with the number of events written.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut log = debug_log();
    if let Some(mut old) = log.writer.take() {
        writeln!(old, "leaf debug log end: {} events", log.written)?;
        old.flush()?;
    }
    let Some(path) = path else {
        return Ok(());
    };
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "leaf debug log start")?;
    writer.flush()?;
    log.start = Instant::now();
    log.written = 0;
    log.writer = Some(writer);
    Ok(())
}

/// Append one event to the debug log, if it is open.
pub fn log_event(event: DebugEvent, detail: impl AsRef<str>) {
    let mut log = debug_log();
    let elapsed_ms = log.start.elapsed().as_secs_f64() * 1000.0;
    let Some(writer) = log.writer.as_mut() else {
        return;
    };
    let line = format!(
        "[{elapsed_ms:>10.3} ms] {}: {}",
        event.as_str(),
        detail.as_ref()
    );
    if writeln!(writer, "{line}").and_then(|()| writer.flush()).is_ok() {
        log.written += 1;
    }
}
