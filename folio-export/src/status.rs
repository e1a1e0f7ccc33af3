//! Status banner and log feed reporting.
//!
//! The coordinator reports every step through [`StatusReporter`]; what the
//! reports turn into (console lines, tracing events, an in-memory feed) is up
//! to the implementation.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, info, warn};

/// Tri-state status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

impl StatusLevel {
    /// Banner background colour
    pub fn background(&self) -> &'static str {
        match self {
            StatusLevel::Success => "#d4edda",
            StatusLevel::Error => "#f8d7da",
            StatusLevel::Info => "#fff3cd",
        }
    }

    /// Banner border colour
    pub fn border(&self) -> &'static str {
        match self {
            StatusLevel::Success => "#28a745",
            StatusLevel::Error => "#dc3545",
            StatusLevel::Info => "#ffc107",
        }
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLevel::Info => write!(f, "info"),
            StatusLevel::Success => write!(f, "success"),
            StatusLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogClass {
    Plain,
    Info,
    Success,
    Error,
}

/// One timestamped line of the log feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub message: String,
    pub class: LogClass,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, class: LogClass) -> Self {
        Self {
            at: Local::now(),
            message: message.into(),
            class,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

pub trait StatusReporter: Send + Sync {
    /// Add an entry to the log feed.
    fn log(&self, entry: LogEntry);

    /// Replace the status banner.
    fn set_status(&self, level: StatusLevel, message: &str);

    /// Enable or disable the export controls.
    fn set_controls_enabled(&self, enabled: bool);
}

/// Reporter that turns the feed into `tracing` events.
#[derive(Debug, Clone, Default)]
pub struct TracingReporter;

impl StatusReporter for TracingReporter {
    fn log(&self, entry: LogEntry) {
        match entry.class {
            LogClass::Error => warn!("{}", entry.message),
            _ => info!("{}", entry.message),
        }
    }

    fn set_status(&self, level: StatusLevel, message: &str) {
        match level {
            StatusLevel::Error => error!(status = %level, "{message}"),
            _ => info!(status = %level, "{message}"),
        }
    }

    fn set_controls_enabled(&self, enabled: bool) {
        debug!(enabled, "controls");
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: Vec<LogEntry>,
    status: Option<(StatusLevel, String)>,
    controls: Vec<bool>,
}

/// Keeps the feed in memory, newest entry first.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    state: Mutex<MemoryState>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> T {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.with_state(|s| s.entries.clone())
    }

    /// Messages, newest first.
    pub fn messages(&self) -> Vec<String> {
        self.with_state(|s| s.entries.iter().map(|e| e.message.clone()).collect())
    }

    pub fn status(&self) -> Option<(StatusLevel, String)> {
        self.with_state(|s| s.status.clone())
    }

    /// Every enable/disable call, oldest first.
    pub fn controls_history(&self) -> Vec<bool> {
        self.with_state(|s| s.controls.clone())
    }

    pub fn controls_enabled(&self) -> bool {
        self.with_state(|s| s.controls.last().copied().unwrap_or(false))
    }
}

impl StatusReporter for MemoryReporter {
    fn log(&self, entry: LogEntry) {
        self.with_state(|s| s.entries.insert(0, entry));
    }

    fn set_status(&self, level: StatusLevel, message: &str) {
        self.with_state(|s| s.status = Some((level, message.to_string())));
    }

    fn set_controls_enabled(&self, enabled: bool) {
        self.with_state(|s| s.controls.push(enabled));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tracing_reporter_levels() {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let r = TracingReporter;
            r.log(LogEntry::new("✓ Fetched 3 positions", LogClass::Success));
            r.log(LogEntry::new("⚠ No positions found", LogClass::Error));
            r.set_status(StatusLevel::Error, "Export failed");
        });

        let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("INFO") && lines[0].contains("✓ Fetched 3 positions"));
        assert!(lines[1].contains("WARN") && lines[1].contains("⚠ No positions found"));
        assert!(lines[2].contains("ERROR") && lines[2].contains("Export failed"));
        assert!(lines[2].contains("status=error"));
    }

    #[test]
    fn test_memory_entries_keep_class() {
        let r = MemoryReporter::new();
        r.log(LogEntry::new("✓ Addon connected", LogClass::Success));
        r.log(LogEntry::new("✗ Error fetching data: boom", LogClass::Error));
        let classes: Vec<LogClass> = r.entries().iter().map(|e| e.class).collect();
        assert_eq!(classes, vec![LogClass::Error, LogClass::Success]);
    }

    #[test]
    fn test_memory_feed_is_prepended() {
        let r = MemoryReporter::new();
        r.log(LogEntry::new("first", LogClass::Plain));
        r.log(LogEntry::new("second", LogClass::Success));
        assert_eq!(r.messages(), vec!["second", "first"]);
    }

    #[test]
    fn test_status_colours() {
        assert_eq!(StatusLevel::Success.background(), "#d4edda");
        assert_eq!(StatusLevel::Error.border(), "#dc3545");
        assert_eq!(StatusLevel::Info.border(), "#ffc107");
    }

    #[test]
    fn test_log_entry_display_has_time_prefix() {
        let e = LogEntry::new("hello", LogClass::Info);
        let s = e.to_string();
        assert!(s.starts_with('['));
        assert!(s.ends_with("] hello"));
    }
}
