//! Logging collaborator injected into the reporter and dispatchers.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Severity of a logged line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Informational.
    Info,
    /// Degraded but continuing.
    Warn,
    /// Something failed.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Sink for operator-facing log lines.
pub trait RunLog: Send + Sync {
    /// Log a line at the given level.
    fn log(&self, level: LogLevel, message: &str);

    /// Log at info level.
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log at warn level.
    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Log at error level.
    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

impl<L: RunLog + ?Sized> RunLog for Arc<L> {
    fn log(&self, level: LogLevel, message: &str) {
        (**self).log(level, message);
    }
}

impl<L: RunLog + ?Sized> RunLog for &L {
    fn log(&self, level: LogLevel, message: &str) {
        (**self).log(level, message);
    }
}

/// Forwards lines to `tracing`, tagged with a component name and run id.
#[derive(Debug, Clone)]
pub struct TracingLog {
    component: String,
    run_id: Option<Uuid>,
}

impl TracingLog {
    /// Create a log for a named component.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            run_id: None,
        }
    }

    /// Tag every line with a run id.
    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = Some(run_id);
        self
    }
}

impl Default for TracingLog {
    fn default() -> Self {
        Self::new("evalreport")
    }
}

impl RunLog for TracingLog {
    fn log(&self, level: LogLevel, message: &str) {
        let run_id = self.run_id.map(|id| id.to_string()).unwrap_or_default();
        match level {
            LogLevel::Info => {
                tracing::info!(component = %self.component, run_id = %run_id, "{}", message)
            }
            LogLevel::Warn => {
                tracing::warn!(component = %self.component, run_id = %run_id, "{}", message)
            }
            LogLevel::Error => {
                tracing::error!(component = %self.component, run_id = %run_id, "{}", message)
            }
        }
    }
}

/// Keeps every line in memory.
///
/// Clones share the same buffer, so a host can hand one clone to the reporter
/// and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct CapturedLog {
    lines: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl CapturedLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines so far.
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().clone()
    }

    /// Lines at one level.
    pub fn at(&self, level: LogLevel) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Check if any line at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.lines
            .lock()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}

impl RunLog for CapturedLog {
    fn log(&self, level: LogLevel, message: &str) {
        self.lines.lock().push((level, message.to_string()));
    }
}
