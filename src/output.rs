// src/output.rs

//! Diagnostics sink for resolution messages
//!
//! The resolver reports what it did (a range resolved, a downstream pin
//! accepted, a candidate skipped) through the `Output` trait. Nothing it
//! receives affects control flow.
//!
//! Implementations:
//! - `TracingOutput`: forwards every line to tracing
//! - `BufferOutput`: keeps lines in memory, for tests and embedding callers
//! - `SilentOutput`: discards everything

use std::fmt;
use std::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};

/// Severity of a diagnostic line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Level::Info => "INFO",
            Level::Success => "OK",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// Receiver of human-readable diagnostics
pub trait Output: Send + Sync {
    /// Informational message
    fn info(&self, message: &str);

    /// Something completed successfully
    fn success(&self, message: &str);

    /// Recoverable problem
    fn warn(&self, message: &str);

    /// Fatal problem, emitted right before an error is returned
    fn error(&self, message: &str);
}

/// Forwards diagnostics to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingOutput;

impl Output for TracingOutput {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn success(&self, message: &str) {
        info!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}

/// Discards all diagnostics
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentOutput;

impl Output for SilentOutput {
    fn info(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Records diagnostics in memory
#[derive(Debug, Default)]
pub struct BufferOutput {
    lines: Mutex<Vec<(Level, String)>>,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn lines(&self) -> MutexGuard<'_, Vec<(Level, String)>> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, level: Level, message: &str) {
        self.lines().push((level, message.to_string()));
    }

    /// All recorded lines with their level
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.lines().clone()
    }

    /// Messages recorded at the given level
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lines()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages(Level::Warn)
    }

    /// Whether any recorded line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|(_, m)| m.contains(needle))
    }

    pub fn clear(&self) {
        self.lines().clear();
    }
}

impl fmt::Display for BufferOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (level, message) in self.lines().iter() {
            writeln!(f, "{}: {}", level, message)?;
        }
        Ok(())
    }
}

impl Output for BufferOutput {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.push(Level::Success, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}
