//! Test doubles for the pipeline's external seams.
//!
//! Lets adapters and the orchestrator be exercised end to end without
//! yt-dlp, spotdl, ffmpeg or network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use trackgrab_core::testing::{fixtures, RecordingSinks, ScriptedProcessRunner, ScriptedStep};
//!
//! let runner = Arc::new(ScriptedProcessRunner::new());
//! runner
//!     .push(ScriptedStep::success().creates(out.join("Song.mp3"), fixtures::mp3_bytes()))
//!     .await;
//!
//! let sinks = RecordingSinks::new();
//! adapter.acquire(&request, &sinks.sinks()).await?;
//! assert_eq!(sinks.statuses().last().unwrap(), "Downloaded 1 file(s)");
//! ```

mod recording_sinks;
mod scripted_runner;
mod stub_artwork;

pub use recording_sinks::RecordingSinks;
pub use scripted_runner::{ScriptedProcessRunner, ScriptedStep};
pub use stub_artwork::StubArtworkFetcher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::io;
    use std::path::{Path, PathBuf};

    use crate::platform::{AcquisitionRequest, AudioFormat, Platform};

    /// Smallest JPEG a tag reader will accept as a picture payload.
    pub const JPEG_BYTES: &[u8] = &[
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00,
        0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xD9,
    ];

    /// MPEG-1 Layer III, 128 kbit/s, 44.1 kHz, no padding.
    const MP3_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
    const MP3_FRAME_LEN: usize = 417;
    const MP3_FRAME_COUNT: usize = 20;

    /// A headerless stream of silent MP3 frames.
    pub fn mp3_bytes() -> Vec<u8> {
        let mut frame = vec![0u8; MP3_FRAME_LEN];
        frame[..4].copy_from_slice(&MP3_FRAME_HEADER);
        frame.repeat(MP3_FRAME_COUNT)
    }

    pub fn write_mp3(path: &Path) -> io::Result<()> {
        std::fs::write(path, mp3_bytes())
    }

    /// Writes a tenth of a second of 16-bit mono silence.
    pub fn write_wav(path: &Path) -> io::Result<()> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).map_err(hound_error)?;
        for _ in 0..4_410 {
            writer.write_sample(0i16).map_err(hound_error)?;
        }
        writer.finalize().map_err(hound_error)
    }

    fn hound_error(err: hound::Error) -> io::Error {
        match err {
            hound::Error::IoError(e) => e,
            other => io::Error::other(other),
        }
    }

    /// A request with an explicit platform.
    pub fn request(
        url: &str,
        platform: Platform,
        format: AudioFormat,
        output_dir: impl Into<PathBuf>,
    ) -> AcquisitionRequest {
        AcquisitionRequest::new(url, platform, format, output_dir)
            .unwrap_or_else(|e| panic!("invalid fixture request {url}: {e}"))
    }

    /// A SoundCloud MP3 request.
    pub fn soundcloud_request(track: &str, output_dir: impl Into<PathBuf>) -> AcquisitionRequest {
        request(
            &format!("https://soundcloud.com/artist/{track}"),
            Platform::SoundCloud,
            AudioFormat::Mp3,
            output_dir,
        )
    }
}
