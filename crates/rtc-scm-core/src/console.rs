//! Console output used for deprecation warnings and substitution traces.

use std::sync::Mutex;

/// Sink for human-readable build diagnostics.
pub trait ConsoleOutput: Send + Sync {
    fn log(&self, message: &str);

    fn log_with_cause(&self, message: &str, cause: &dyn std::error::Error);
}

/// Forwards console output to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingConsole;

impl ConsoleOutput for TracingConsole {
    fn log(&self, message: &str) {
        tracing::info!(target: "rtc_scm::console", "{}", message);
    }

    fn log_with_cause(&self, message: &str, cause: &dyn std::error::Error) {
        tracing::warn!(target: "rtc_scm::console", cause = %cause, "{}", message);
    }
}

/// A logged console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
    pub message: String,
    pub cause: Option<String>,
}

/// Keeps every message in memory so callers can surface them later.
#[derive(Debug, Default)]
pub struct BufferedConsole {
    messages: Mutex<Vec<ConsoleMessage>>,
}

impl BufferedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages logged so far.
    pub fn messages(&self) -> Vec<ConsoleMessage> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Whether any logged message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.message.contains(needle))
    }

    fn push(&self, message: ConsoleMessage) {
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message),
            Err(poisoned) => poisoned.into_inner().push(message),
        }
    }
}

impl ConsoleOutput for BufferedConsole {
    fn log(&self, message: &str) {
        self.push(ConsoleMessage {
            message: message.to_string(),
            cause: None,
        });
    }

    fn log_with_cause(&self, message: &str, cause: &dyn std::error::Error) {
        self.push(ConsoleMessage {
            message: message.to_string(),
            cause: Some(cause.to_string()),
        });
    }
}
