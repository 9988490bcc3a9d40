//! Sinks that remember what they were told.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::sink::{ErrorSink, LogSink, Sinks, StatusSink};

/// Records every status, log and error message in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSinks {
    statuses: Mutex<Vec<String>>,
    logs: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

fn lock(messages: &Mutex<Vec<String>>) -> MutexGuard<'_, Vec<String>> {
    // A panicking test thread must not hide what was recorded.
    messages.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RecordingSinks {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A [`Sinks`] bundle routing all three channels here.
    pub fn sinks(self: &Arc<Self>) -> Sinks {
        Sinks::from_shared(Arc::clone(self))
    }

    pub fn statuses(&self) -> Vec<String> {
        lock(&self.statuses).clone()
    }

    pub fn logs(&self) -> Vec<String> {
        lock(&self.logs).clone()
    }

    pub fn errors(&self) -> Vec<String> {
        lock(&self.errors).clone()
    }
}

impl StatusSink for RecordingSinks {
    fn status(&self, message: &str) {
        lock(&self.statuses).push(message.to_string());
    }
}

impl LogSink for RecordingSinks {
    fn log(&self, message: &str) {
        lock(&self.logs).push(message.to_string());
    }
}

impl ErrorSink for RecordingSinks {
    fn error(&self, message: &str) {
        lock(&self.errors).push(message.to_string());
    }
}
