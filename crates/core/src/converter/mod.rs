//! Converter module for transcoding downloaded audio.
//!
//! Catalog downloads always arrive as MP3. When WAV output is requested, each
//! file is transcoded by ffmpeg to 16-bit PCM at 44.1 kHz:
//!
//! ```text
//! <ffmpeg> -y -i <input> -acodec pcm_s16le -ar 44100 <output>
//! ```
//!
//! # Example
//!
//! ```ignore
//! use trackgrab_core::converter::{Converter, ConversionJob, FfmpegConverter};
//!
//! let converter = FfmpegConverter::new(runner, resolver);
//! let job = ConversionJob::to_wav("/music/Song.mp3");
//! let result = converter.convert(job, &log_sink).await?;
//! println!("Converted in {} ms", result.duration_ms);
//! ```

mod error;
mod ffmpeg;
mod traits;
mod types;

pub use error::ConverterError;
pub use ffmpeg::FfmpegConverter;
pub use traits::Converter;
pub use types::{ConversionJob, ConversionResult, PCM_CODEC, WAV_SAMPLE_RATE_HZ};
