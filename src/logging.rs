//! Deterministic generation log
//!
//! Records what happened during a generation run without side effects, so the
//! log itself is reproducible for a given seed and input. Process-level
//! logging goes through `tracing`; this log is data a caller can inspect.

use serde::{Deserialize, Serialize};

/// Log level for generation events
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// A single generation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Category the event concerns, if any
    pub category: Option<String>,
    /// Listing the event concerns, if any
    pub listing_id: Option<u64>,
    /// Additional structured data
    pub metadata: Vec<(String, String)>,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            category: None,
            listing_id: None,
            metadata: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_listing(mut self, id: u64) -> Self {
        self.listing_id = Some(id);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }
}

/// Collects log entries at or above a minimum level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationLog {
    entries: Vec<LogEntry>,
    min_level: LogLevel,
}

impl GenerationLog {
    /// Log that keeps entries at or above `min_level`
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            entries: Vec::new(),
            min_level,
        }
    }

    /// Capture every level
    pub fn all() -> Self {
        Self::new(LogLevel::Trace)
    }

    /// Record an entry if it meets the minimum level
    pub fn log(&mut self, entry: LogEntry) {
        if entry.level >= self.min_level {
            self.entries.push(entry);
        }
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Debug, message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Info, message));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Warn, message));
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries at exactly `level`
    pub fn filter_by_level(&self, level: LogLevel) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.level == level).collect()
    }

    /// Entries tagged with `category`
    pub fn filter_by_category(&self, category: &str) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.category.as_deref() == Some(category))
            .collect()
    }
}

impl Default for GenerationLog {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}
