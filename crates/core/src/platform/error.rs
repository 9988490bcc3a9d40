use std::path::PathBuf;
use thiserror::Error;

use crate::converter::ConverterError;
use crate::process::ProcessError;

use super::types::Platform;

/// Fatal, per-item acquisition failures.
///
/// Tagging and artwork problems are not errors; they degrade the item.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("No files produced by {platform} in {}", dir.display())]
    NoOutputProduced { platform: Platform, dir: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConverterError),
}

impl AcquisitionError {
    /// Short label for the failure-reason metric.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Process(_) => "process",
            Self::NoOutputProduced { .. } => "no_output",
            Self::Io(_) => "io",
            Self::Conversion(_) => "conversion",
        }
    }
}
