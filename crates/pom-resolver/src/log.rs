//! Diagnostic sink for resolution warnings and errors.
//!
//! The engine never fails on a resolution problem; it reports through this
//! sink and keeps going with the best partial answer. Callers that need to
//! detect incompleteness inspect the sink (or a project's unresolved
//! property set) after the fact.

use std::cell::RefCell;

/// Receives short, human-readable diagnostic messages.
pub trait Log {
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards diagnostics to the ambient `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl Log for TracingLog {
    fn warning(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Accumulates diagnostics in memory.
///
/// Test suites use this to assert on exactly which warnings a resolution
/// produced; interactive callers can use it to render a report.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: RefCell<Vec<LogEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages_at(LogLevel::Warning)
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages_at(LogLevel::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message.clone())
            .collect()
    }
}

impl Log for MemoryLog {
    fn warning(&self, message: &str) {
        self.entries.borrow_mut().push(LogEntry {
            level: LogLevel::Warning,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.entries.borrow_mut().push(LogEntry {
            level: LogLevel::Error,
            message: message.to_string(),
        });
    }
}
