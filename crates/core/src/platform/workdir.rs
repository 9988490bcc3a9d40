//! Scoped change of the process working directory.

use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Serializes every working directory change in the process.
static CWD_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Changes the working directory for its lifetime.
///
/// Holds a process-wide lock, so at most one guard exists at a time. The
/// previous directory is restored on drop, on every exit path.
#[derive(Debug)]
pub struct WorkingDirGuard {
    previous: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl WorkingDirGuard {
    /// Waits for the lock, then changes into `dir`.
    pub async fn enter(dir: &Path) -> std::io::Result<Self> {
        let lock = CWD_LOCK.lock().await;
        let previous = std::env::current_dir()?;
        std::env::set_current_dir(dir)?;
        debug!("Working directory set to {}", dir.display());

        Ok(Self {
            previous,
            _lock: lock,
        })
    }

    /// Directory restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            warn!(
                "Failed to restore working directory {}: {}",
                self.previous.display(),
                e
            );
        }
    }
}
