//! Track metadata: extraction from sidecar files and tag embedding.
//!
//! yt-dlp writes a `<stem>.info.json` sidecar next to every download. The
//! [`extract`] function turns that (or just the filename) into a
//! [`TrackMetadata`], which [`TagEmbedder`] writes into the audio container.

mod embedder;
mod error;
mod extractor;
mod types;

pub use embedder::TagEmbedder;
pub use error::TagError;
pub use extractor::{extract, sidecar_path};
pub use types::{TrackMetadata, UNKNOWN_ALBUM, UNKNOWN_ARTIST};
