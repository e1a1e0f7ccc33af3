//! Terminal rendering of the export feed.

use crossterm::style::Stylize;
use folio_export::{LogClass, LogEntry, StatusLevel, StatusReporter};
use tracing::debug;

/// Prints log entries as they arrive and the status banner in colour.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl StatusReporter for ConsoleReporter {
    fn log(&self, entry: LogEntry) {
        let line = entry.to_string();
        match entry.class {
            LogClass::Plain => println!("{line}"),
            LogClass::Info => println!("{}", line.cyan()),
            LogClass::Success => println!("{}", line.green()),
            LogClass::Error => println!("{}", line.red()),
        }
    }

    fn set_status(&self, level: StatusLevel, message: &str) {
        let banner = format!("» {message}");
        match level {
            StatusLevel::Info => println!("{}", banner.yellow().bold()),
            StatusLevel::Success => println!("{}", banner.green().bold()),
            StatusLevel::Error => println!("{}", banner.red().bold()),
        }
    }

    fn set_controls_enabled(&self, enabled: bool) {
        debug!(enabled, "export controls");
    }
}
