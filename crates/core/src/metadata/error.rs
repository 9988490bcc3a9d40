use std::path::PathBuf;
use thiserror::Error;

/// Tag read/write failures.
///
/// The adapters treat these as warnings: the audio file is kept untagged.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("failed to embed metadata into {}: {reason}", path.display())]
    EmbedFailed { path: PathBuf, reason: String },

    #[error("failed to read metadata from {}: {reason}", path.display())]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to embed metadata into {}: unsupported container {found}", path.display())]
    UnsupportedFormat { path: PathBuf, found: String },
}

impl TagError {
    pub fn embed_failed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::EmbedFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn read_failed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ReadFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
