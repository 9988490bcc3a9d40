//! Types for the converter module.

use std::path::{Path, PathBuf};

/// ffmpeg codec for 16-bit little-endian PCM.
pub const PCM_CODEC: &str = "pcm_s16le";

/// Sample rate of converted WAV files.
pub const WAV_SAMPLE_RATE_HZ: u32 = 44_100;

/// A single conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// Source file.
    pub input_path: PathBuf,
    /// Destination file, overwritten if present.
    pub output_path: PathBuf,
}

impl ConversionJob {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }

    /// Converts `input` to a `.wav` file next to it with the same stem.
    pub fn to_wav(input: impl AsRef<Path>) -> Self {
        let input = input.as_ref();
        Self::new(input, input.with_extension("wav"))
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Path to the converted file.
    pub output_path: PathBuf,
    /// Size of the output file in bytes.
    pub output_size_bytes: u64,
    /// Conversion time in milliseconds.
    pub duration_ms: u64,
}
