//! Stub artwork fetcher for testing.

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::artwork::ArtworkFetcher;

use super::fixtures::JPEG_BYTES;

/// [`ArtworkFetcher`] that writes a fixed JPEG, or fails on demand.
#[derive(Debug)]
pub struct StubArtworkFetcher {
    succeed: AtomicBool,
    requests: RwLock<Vec<String>>,
}

impl StubArtworkFetcher {
    fn with_outcome(succeed: bool) -> Self {
        Self {
            succeed: AtomicBool::new(succeed),
            requests: RwLock::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_outcome(true)
    }

    pub fn failing() -> Self {
        Self::with_outcome(false)
    }

    pub async fn set_succeed(&self, succeed: bool) {
        self.succeed.store(succeed, Ordering::SeqCst);
    }

    /// URLs requested so far.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl ArtworkFetcher for StubArtworkFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> bool {
        self.requests.write().await.push(url.to_string());
        if !self.succeed.load(Ordering::SeqCst) {
            return false;
        }
        tokio::fs::write(destination, JPEG_BYTES).await.is_ok()
    }
}
