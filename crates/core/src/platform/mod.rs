//! Platform adapters: one URL in, N tagged audio files out.
//!
//! - [`SoundCloudAdapter`] drives yt-dlp and post-processes each file with
//!   sidecar metadata and fetched artwork.
//! - [`CatalogAdapter`] drives spotdl for Spotify and Apple Music, with
//!   optional WAV conversion.

mod catalog;
mod error;
mod progress;
mod registry;
mod scan;
mod soundcloud;
mod traits;
mod types;
mod workdir;

pub use catalog::CatalogAdapter;
pub use error::AcquisitionError;
pub use progress::{parse_progress, ProgressLog};
pub use registry::AdapterRegistry;
pub use soundcloud::SoundCloudAdapter;
pub use traits::PlatformAdapter;
pub use types::{
    AcquisitionOutput, AcquisitionRequest, AcquisitionResult, AudioFormat, InvalidRequest,
    Platform,
};
pub use workdir::WorkingDirGuard;
