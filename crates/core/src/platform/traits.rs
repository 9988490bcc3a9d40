use async_trait::async_trait;

use crate::sink::Sinks;

use super::error::AcquisitionError;
use super::types::{AcquisitionOutput, AcquisitionRequest, Platform};

/// Turns one [`AcquisitionRequest`] into files on disk.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Returns the name of this adapter implementation.
    fn name(&self) -> &str;

    /// Platforms this adapter handles.
    fn platforms(&self) -> &[Platform];

    /// Acquires `request.url` into `request.output_dir`.
    ///
    /// Creates the output directory if needed. Fatal errors are reported on
    /// the error sink before being returned.
    async fn acquire(
        &self,
        request: &AcquisitionRequest,
        sinks: &Sinks,
    ) -> Result<AcquisitionOutput, AcquisitionError>;
}
