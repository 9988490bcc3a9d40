use serde::{Deserialize, Serialize};

/// Artist used when neither tags nor sidecar name one.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Album used when neither tags nor sidecar name one.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Normalized metadata for one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Release year. `None` when unknown; never `Some("")`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Remote cover image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_url: Option<String>,
}

impl TrackMetadata {
    /// Metadata with only a title; everything else at its default.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: UNKNOWN_ARTIST.to_string(),
            album: UNKNOWN_ALBUM.to_string(),
            year: None,
            artwork_url: None,
        }
    }

    /// Sets the year, dropping empty values.
    pub fn year(mut self, year: impl Into<String>) -> Self {
        let year = year.into();
        let year = year.trim();
        self.year = (!year.is_empty()).then(|| year.to_string());
        self
    }
}
