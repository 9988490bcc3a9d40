//! FIFO work queue of pending acquisition requests.
//!
//! The handle is cheap to clone; producers (the caller) and the consumer
//! (the batch orchestrator) share the same underlying deque.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::platform::AcquisitionRequest;

/// Shared FIFO queue of [`AcquisitionRequest`]s.
#[derive(Debug, Clone, Default)]
pub struct WorkQueue {
    items: Arc<Mutex<VecDeque<AcquisitionRequest>>>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a request at the back. Returns the new queue length.
    pub async fn enqueue(&self, request: AcquisitionRequest) -> usize {
        let mut items = self.items.lock().await;
        debug!("Queued {} ({})", request.url, request.id);
        items.push_back(request);
        items.len()
    }

    /// Appends several requests, keeping their order.
    pub async fn enqueue_all(&self, requests: impl IntoIterator<Item = AcquisitionRequest>) -> usize {
        let mut items = self.items.lock().await;
        items.extend(requests);
        items.len()
    }

    /// Removes and returns the oldest request.
    pub async fn dequeue(&self) -> Option<AcquisitionRequest> {
        self.items.lock().await.pop_front()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    /// Drops every pending request. Returns how many were dropped.
    pub async fn clear(&self) -> usize {
        let mut items = self.items.lock().await;
        let dropped = items.len();
        items.clear();
        dropped
    }

    /// Pending requests in order, for display.
    pub async fn snapshot(&self) -> Vec<AcquisitionRequest> {
        self.items.lock().await.iter().cloned().collect()
    }
}
