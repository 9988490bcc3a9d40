//! Cover artwork download.
//!
//! Artwork is optional enrichment: every failure is logged and reported as
//! `false`, never as an error.

mod fetcher;

pub use fetcher::{ArtworkFetcher, HttpArtworkFetcher};
