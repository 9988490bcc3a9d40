//! Batch orchestrator implementation.
//!
//! One background task per batch. Requests are dispatched strictly in
//! sequence; adapter errors and panics become failed results and the loop
//! moves on to the next item.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::metrics;
use crate::platform::{AcquisitionRequest, AcquisitionResult, AdapterRegistry};
use crate::queue::WorkQueue;
use crate::sink::Sinks;

use super::config::OrchestratorConfig;
use super::types::{BatchSummary, OrchestratorError, OrchestratorState};

/// Drains a [`WorkQueue`] through the registered platform adapters.
pub struct BatchOrchestrator {
    config: OrchestratorConfig,
    adapters: Arc<AdapterRegistry>,
    running: Arc<AtomicBool>,
}

/// Resets the running flag when the batch task ends, including by panic.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Handle to a batch running in the background.
#[derive(Debug)]
pub struct BatchHandle {
    cancel: CancellationToken,
    task: JoinHandle<BatchSummary>,
}

impl BatchHandle {
    /// Requests a graceful stop. The in-flight item finishes; the rest stay
    /// queued.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token observed between items; cancelling it is the same as
    /// [`cancel`](Self::cancel).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Waits for the batch to end and returns its summary.
    pub async fn join(self) -> Result<BatchSummary, OrchestratorError> {
        self.task
            .await
            .map_err(|e| OrchestratorError::Join(e.to_string()))
    }
}

impl BatchOrchestrator {
    pub fn new(config: OrchestratorConfig, adapters: AdapterRegistry) -> Self {
        Self {
            config,
            adapters: Arc::new(adapters),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> OrchestratorState {
        if self.running.load(Ordering::SeqCst) {
            OrchestratorState::Running
        } else {
            OrchestratorState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == OrchestratorState::Running
    }

    /// Starts draining `queue` on a background task.
    pub async fn start(
        &self,
        queue: WorkQueue,
        sinks: Sinks,
    ) -> Result<BatchHandle, OrchestratorError> {
        self.start_with_cancellation(queue, sinks, CancellationToken::new())
            .await
    }

    /// Like [`start`](Self::start), observing a caller-owned token.
    pub async fn start_with_cancellation(
        &self,
        queue: WorkQueue,
        sinks: Sinks,
        cancel: CancellationToken,
    ) -> Result<BatchHandle, OrchestratorError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Batch already running");
            return Err(OrchestratorError::AlreadyRunning);
        }
        let guard = RunningGuard(Arc::clone(&self.running));

        let total = queue.len().await;
        if total == 0 {
            sinks.error(&OrchestratorError::EmptyQueue.to_string());
            return Err(OrchestratorError::EmptyQueue);
        }

        info!("Starting batch of {} request(s)", total);

        let batch = Batch {
            separator: self.config.separator(),
            adapters: Arc::clone(&self.adapters),
            queue,
            sinks,
            cancel: cancel.clone(),
            total,
        };
        let task = tokio::spawn(async move {
            let _guard = guard;
            batch.run().await
        });

        Ok(BatchHandle { cancel, task })
    }
}

/// State owned by one batch task.
struct Batch {
    separator: Option<String>,
    adapters: Arc<AdapterRegistry>,
    queue: WorkQueue,
    sinks: Sinks,
    cancel: CancellationToken,
    total: usize,
}

impl Batch {
    async fn run(self) -> BatchSummary {
        let started_at = Utc::now();
        let mut results = Vec::with_capacity(self.total);
        let mut cancelled = false;

        loop {
            if self.cancel.is_cancelled() {
                let remaining = self.queue.len().await;
                info!("Batch cancelled, {} request(s) left in queue", remaining);
                cancelled = true;
                break;
            }
            let Some(request) = self.queue.dequeue().await else {
                break;
            };
            let index = results.len() + 1;

            if let Some(separator) = &self.separator {
                self.sinks.log(separator);
            }
            self.sinks
                .status(&format!("Processing {}/{}...", index, self.total));

            results.push(self.process(&request).await);
        }

        let completed = results.len();
        self.sinks.status(&format!(
            "Completed {}/{} downloads",
            completed, self.total
        ));

        let outcome = if cancelled { "cancelled" } else { "drained" };
        metrics::BATCHES_TOTAL.with_label_values(&[outcome]).inc();

        let summary = BatchSummary::new(self.total, results, started_at, cancelled);
        info!(
            "Batch finished: {} succeeded, {} failed, {} degraded",
            summary.succeeded,
            summary.failed,
            summary.degraded()
        );
        summary
    }

    /// Runs one request through its adapter. Never fails.
    async fn process(&self, request: &AcquisitionRequest) -> AcquisitionResult {
        let platform = request.platform;
        let started = Instant::now();
        debug!("Dispatching {} ({})", request.id, request.url);

        // Failures carry (metric reason, message).
        let outcome = match self.adapters.get(platform) {
            Some(adapter) => {
                match AssertUnwindSafe(adapter.acquire(request, &self.sinks))
                    .catch_unwind()
                    .await
                {
                    Ok(Ok(output)) => Ok(output),
                    Ok(Err(e)) => Err((e.kind(), e.to_string())),
                    Err(panic) => {
                        let reason = panic_message(panic.as_ref());
                        error!("Adapter {} panicked: {}", adapter.name(), reason);
                        Err((
                            "panic",
                            format!("{} adapter panicked: {}", adapter.name(), reason),
                        ))
                    }
                }
            }
            None => {
                let err = OrchestratorError::UnsupportedPlatform(platform).to_string();
                self.sinks.error(&err);
                Err(("unsupported_platform", err))
            }
        };

        let elapsed = started.elapsed();
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        metrics::ACQUISITION_DURATION
            .with_label_values(&[platform.as_str()])
            .observe(elapsed.as_secs_f64());

        match outcome {
            Ok(output) => {
                let label = if output.degraded { "degraded" } else { "success" };
                metrics::ACQUISITIONS_TOTAL
                    .with_label_values(&[platform.as_str(), label])
                    .inc();
                info!(
                    "Request {} done: {} file(s) in {} ms",
                    request.id,
                    output.files.len(),
                    elapsed_ms
                );
                AcquisitionResult::succeeded(request, output, elapsed_ms)
            }
            Err((reason, err)) => {
                metrics::ACQUISITIONS_TOTAL
                    .with_label_values(&[platform.as_str(), "failed"])
                    .inc();
                metrics::ACQUISITION_FAILURES
                    .with_label_values(&[platform.as_str(), reason])
                    .inc();
                warn!("Request {} failed: {}", request.id, err);
                self.sinks.log(&format!("Failed: {}", err));
                AcquisitionResult::failed(request, err, elapsed_ms)
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
