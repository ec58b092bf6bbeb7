//! Event sinks for import progress.
//!
//! The importer reports progress, rejected rows and failures through an
//! [`EventSink`] handed to it by the caller instead of logging directly, so
//! the pipeline can run under tests without a logger installed.
//!
//! - [`LogSink`] forwards to the `log` facade and appends each event to the
//!   companion run log (`import.log`).
//! - [`MemorySink`] keeps events in memory for assertions.

use std::{
    cell::RefCell,
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::Local;
use log::Level;

use crate::io_utils;

pub trait EventSink {
    fn emit(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }
}

/// Forwards events to the `log` facade and mirrors them into the run log.
/// A failed write to the run log is dropped and the import carries on.
#[derive(Debug)]
pub struct LogSink {
    run_log: Mutex<File>,
}

impl LogSink {
    /// Opens `path` in append mode, creating the parent directory when missing.
    pub fn with_run_log(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            io_utils::ensure_dir(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Opening run log {path:?}"))?;
        Ok(Self {
            run_log: Mutex::new(file),
        })
    }
}

impl EventSink for LogSink {
    fn emit(&self, level: Level, message: &str) {
        log::log!(level, "{message}");
        if let Ok(mut file) = self.run_log.lock() {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "{timestamp} - {level} - {message}");
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    events: RefCell<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(Level, String)> {
        self.events.borrow().clone()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|(event_level, _)| *event_level == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, level: Level, message: &str) {
        self.events.borrow_mut().push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_sink_filters_by_level() {
        let sink = MemorySink::new();
        sink.info("starting");
        sink.warn("line 3 rejected");
        sink.error("boom");
        assert_eq!(sink.events().len(), 3);
        assert_eq!(sink.messages_at(Level::Warn), vec!["line 3 rejected"]);
    }

    #[test]
    fn run_log_appends_across_sinks() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("import.log");
        {
            let sink = LogSink::with_run_log(&path).expect("open run log");
            sink.info("first run");
        }
        {
            let sink = LogSink::with_run_log(&path).expect("reopen run log");
            sink.warn("second run");
        }
        let contents = std::fs::read_to_string(&path).expect("read run log");
        let lines = contents.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - INFO - first run"));
        assert!(lines[1].ends_with(" - WARN - second run"));
    }
}
