//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

use crate::process::ProcessError;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// The converter process could not be launched or exited nonzero.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// The converter exited cleanly but left no output file.
    #[error("Conversion produced no output: {path}")]
    OutputMissing { path: PathBuf },

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// The underlying process error, if the converter binary failed.
    pub fn process_error(&self) -> Option<&ProcessError> {
        match self {
            Self::Process(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_error_is_transparent() {
        let err: ConverterError =
            ProcessError::command_failed("ffmpeg -y -i a.mp3 a.wav", Some(1), "bad input").into();
        assert!(err.to_string().starts_with("Command failed: ffmpeg"));
        assert!(err.process_error().is_some());
    }

    #[test]
    fn test_output_missing_message() {
        let err = ConverterError::OutputMissing {
            path: PathBuf::from("/m/a.wav"),
        };
        assert_eq!(err.to_string(), "Conversion produced no output: /m/a.wav");
        assert!(err.process_error().is_none());
    }
}
