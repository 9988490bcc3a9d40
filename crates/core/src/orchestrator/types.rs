//! Types for the batch orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::{AcquisitionResult, Platform};

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A batch is already being processed.
    #[error("a batch is already running")]
    AlreadyRunning,

    /// Nothing to process.
    #[error("Queue is empty.")]
    EmptyQueue,

    /// No adapter registered for the request's platform.
    #[error("no adapter registered for {0}")]
    UnsupportedPlatform(Platform),

    /// The background task panicked or was aborted.
    #[error("batch task failed: {0}")]
    Join(String),
}

/// Lifecycle of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorState {
    Idle,
    Running,
}

/// Aggregate outcome of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Queue length when the batch started.
    pub total: usize,
    /// Items dequeued and processed, successfully or not.
    pub completed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Per-item results, in processing order.
    pub results: Vec<AcquisitionResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Stopped early by a cancellation request.
    pub cancelled: bool,
}

impl BatchSummary {
    pub(crate) fn new(
        total: usize,
        results: Vec<AcquisitionResult>,
        started_at: DateTime<Utc>,
        cancelled: bool,
    ) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total,
            completed: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
            started_at,
            finished_at: Utc::now(),
            cancelled,
        }
    }

    /// Items that succeeded but kept at least one untagged file.
    pub fn degraded(&self) -> usize {
        self.results.iter().filter(|r| r.success && r.degraded).count()
    }

    /// Every processed item succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Wall time of the batch in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
