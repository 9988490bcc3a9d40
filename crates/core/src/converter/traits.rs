//! Trait definitions for the converter module.

use async_trait::async_trait;

use crate::sink::LogSink;

use super::error::ConverterError;
use super::types::{ConversionJob, ConversionResult};

/// A converter that transcodes audio files.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Runs `job`, forwarding converter output to `output`.
    async fn convert(
        &self,
        job: ConversionJob,
        output: &dyn LogSink,
    ) -> Result<ConversionResult, ConverterError>;
}
