use std::fmt;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Ok,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            LogLevel::Ok => "ok",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Human-readable narrative of one driver run.
///
/// Every entry is mirrored to `tracing` as it is recorded and the whole list
/// ends up in the run's `summary.txt`.
#[derive(Debug, Default)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("[ok] {}", message);
        self.push(LogLevel::Ok, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("[info] {}", message);
        self.push(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("[warn] {}", message);
        self.push(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("[error] {}", message);
        self.push(LogLevel::Error, message);
    }

    fn push(&mut self, level: LogLevel, message: String) {
        self.entries.push(LogEntry { level, message });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries at `level` whose message contains `needle`
    pub fn count_matching(&self, level: LogLevel, needle: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.level == level && e.message.contains(needle))
            .count()
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("[{}] {}", e.level, e.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
