//! Callback sinks the pipeline reports through.
//!
//! The presentation layer implements these; the pipeline never talks to a UI
//! toolkit directly. Implementations must be cheap and must not block: they are
//! called from the batch worker task.

use std::sync::Arc;

use tracing::{error, info};

/// Receives short, user-facing status lines ("Downloading from Spotify...").
pub trait StatusSink: Send + Sync {
    fn status(&self, message: &str);
}

/// Receives detailed log lines, including raw tool output.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);
}

/// Receives per-item errors meant to be surfaced to the user.
pub trait ErrorSink: Send + Sync {
    fn error(&self, message: &str);
}

/// The three sinks bundled together.
#[derive(Clone)]
pub struct Sinks {
    pub status: Arc<dyn StatusSink>,
    pub log: Arc<dyn LogSink>,
    pub error: Arc<dyn ErrorSink>,
}

impl Sinks {
    pub fn new(
        status: Arc<dyn StatusSink>,
        log: Arc<dyn LogSink>,
        error: Arc<dyn ErrorSink>,
    ) -> Self {
        Self { status, log, error }
    }

    /// Uses one value for all three sinks.
    pub fn from_shared<T>(sink: Arc<T>) -> Self
    where
        T: StatusSink + LogSink + ErrorSink + 'static,
    {
        Self {
            status: sink.clone(),
            log: sink.clone(),
            error: sink,
        }
    }

    /// Sinks that forward everything to `tracing`.
    pub fn tracing() -> Self {
        Self::from_shared(Arc::new(TracingSinks))
    }

    pub fn status(&self, message: &str) {
        self.status.status(message);
    }

    pub fn log(&self, message: &str) {
        self.log.log(message);
    }

    pub fn error(&self, message: &str) {
        self.error.error(message);
    }
}

impl std::fmt::Debug for Sinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sinks").finish_non_exhaustive()
    }
}

/// Sink implementation backed by `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSinks;

impl StatusSink for TracingSinks {
    fn status(&self, message: &str) {
        info!(target: "trackgrab::status", "{}", message);
    }
}

impl LogSink for TracingSinks {
    fn log(&self, message: &str) {
        info!(target: "trackgrab::log", "{}", message);
    }
}

impl ErrorSink for TracingSinks {
    fn error(&self, message: &str) {
        error!(target: "trackgrab::error", "{}", message);
    }
}
