use chrono::Local;
use serde::{Deserialize, Serialize};

/// Severity of a log line. The same vocabulary is used for panel coloring
/// and for the `status` field the backend attaches to each result message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One visible log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub severity: Severity,
    pub message: String,
}

/// Wall-clock timestamp in the format the panel displays.
pub fn now_timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// In-memory mirror of the operator-visible log panel. Append-only; only
/// an explicit clear empties it.
#[derive(Debug, Default)]
pub struct LogPanel {
    entries: Vec<LogEntry>,
}

impl LogPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new entry stamped with the current time and return a copy
    /// for the view to render.
    pub fn append(&mut self, severity: Severity, message: impl Into<String>) -> LogEntry {
        let entry = LogEntry {
            timestamp: now_timestamp(),
            severity,
            message: message.into(),
        };
        self.entries.push(entry.clone());
        entry
    }

    pub fn clear(&mut self) {
        self.entries.clear();
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
}
