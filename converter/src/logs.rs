//! Operator-facing log output.
//!
//! All conversion steps report through the helpers at the bottom of this
//! module. Entries go to stderr so stdout stays free for command output
//! (`inspect`, `columns`, `summary`).

use std::sync::atomic::{AtomicU8, Ordering};

use once_cell::sync::Lazy;

/// Log level, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    fn as_u8(self) -> u8 {
        match self {
            LogLevel::Debug => 0,
            LogLevel::Info => 1,
            LogLevel::Success => 2,
            LogLevel::Warning => 3,
            LogLevel::Error => 4,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Success,
            3 => LogLevel::Warning,
            _ => LogLevel::Error,
        }
    }

    /// Parse a `GTWTABLE_LOG` style value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "debug" | "verbose" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" | "quiet" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// A single log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    pub indent: u8,
}

impl LogEntry {
    pub fn debug(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Debug, message: message.into(), indent: 0 }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Render the entry the way it is printed.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Debug => "   ·",
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// Global logger
pub static LOGGER: Lazy<Logger> = Lazy::new(Logger::new);

/// Filters entries by level and prints them to stderr
pub struct Logger {
    threshold: AtomicU8,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            threshold: AtomicU8::new(LogLevel::Info.as_u8()),
        }
    }

    /// Set the least severe level that is still printed
    pub fn set_level(&self, level: LogLevel) {
        self.threshold.store(level.as_u8(), Ordering::Relaxed);
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.threshold.load(Ordering::Relaxed))
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }

    /// Print a log entry if its level passes the threshold
    pub fn log(&self, entry: LogEntry) {
        if self.enabled(entry.level) {
            eprintln!("{}", entry.render());
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LOGGER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOGGER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOGGER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOGGER.log(LogEntry::error(msg));
}

pub fn log_debug_indent(msg: impl Into<String>, indent: u8) {
    LOGGER.log(LogEntry::debug(msg).with_indent(indent));
}
