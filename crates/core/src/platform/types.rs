//! Types shared by the platform adapters and the orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Streaming platform a request is acquired from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "soundcloud")]
    SoundCloud,
    #[serde(rename = "spotify")]
    Spotify,
    #[serde(rename = "applemusic", alias = "apple_music")]
    AppleMusic,
}

impl Platform {
    /// All supported platforms, in display order.
    pub const ALL: [Platform; 3] = [Self::SoundCloud, Self::Spotify, Self::AppleMusic];

    /// Human readable platform name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SoundCloud => "SoundCloud",
            Self::Spotify => "Spotify",
            Self::AppleMusic => "Apple Music",
        }
    }

    /// Stable identifier used in config, metrics labels and the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SoundCloud => "soundcloud",
            Self::Spotify => "spotify",
            Self::AppleMusic => "applemusic",
        }
    }

    /// Infers the platform from a track or playlist URL.
    ///
    /// Only the host is inspected, so share links with tracking query
    /// parameters are recognized too.
    pub fn detect(url: &str) -> Option<Self> {
        let rest = url
            .trim()
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(url.trim());
        let host = rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);

        match host {
            "soundcloud.com" | "m.soundcloud.com" | "on.soundcloud.com" => Some(Self::SoundCloud),
            "open.spotify.com" | "spotify.link" => Some(Self::Spotify),
            "music.apple.com" | "itunes.apple.com" => Some(Self::AppleMusic),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soundcloud" | "sound_cloud" => Ok(Self::SoundCloud),
            "spotify" => Ok(Self::Spotify),
            "applemusic" | "apple_music" | "apple-music" => Ok(Self::AppleMusic),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

/// Output container requested for an acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    /// MPEG Audio Layer III, 320 kbps.
    #[default]
    Mp3,
    /// 16-bit PCM WAVE.
    Wav,
}

impl AudioFormat {
    /// File extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }

    /// Whether `path` carries this format's extension (case-insensitive).
    pub fn matches_path(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(self.extension()))
            .unwrap_or(false)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_ascii_uppercase())
    }
}

impl FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp3" => Ok(Self::Mp3),
            "wav" | "wave" => Ok(Self::Wav),
            other => Err(format!("unsupported audio format: {}", other)),
        }
    }
}

/// A single queued download request.
///
/// Immutable once built; the orchestrator consumes it exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionRequest {
    /// Unique request id (uuid v4).
    pub id: String,
    /// Source URL as entered by the user.
    pub url: String,
    /// Platform the URL belongs to.
    pub platform: Platform,
    /// Requested output container.
    pub format: AudioFormat,
    /// Directory the produced files end up in.
    pub output_dir: PathBuf,
}

impl AcquisitionRequest {
    /// Builds a request, rejecting empty URLs.
    pub fn new(
        url: impl Into<String>,
        platform: Platform,
        format: AudioFormat,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, InvalidRequest> {
        let url = url.into().trim().to_string();
        if url.is_empty() {
            return Err(InvalidRequest::EmptyUrl);
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            url,
            platform,
            format,
            output_dir: output_dir.into(),
        })
    }

    /// Builds a request whose platform is inferred from the URL host.
    pub fn detect(
        url: impl Into<String>,
        format: AudioFormat,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, InvalidRequest> {
        let url = url.into();
        let platform =
            Platform::detect(&url).ok_or_else(|| InvalidRequest::UnknownPlatform(url.clone()))?;
        Self::new(url, platform, format, output_dir)
    }
}

/// Reasons a request cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRequest {
    #[error("Please enter a valid URL.")]
    EmptyUrl,

    #[error("could not detect platform for URL: {0}")]
    UnknownPlatform(String),
}

/// Outcome of one acquisition, aggregated by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionResult {
    /// Id of the request this result belongs to.
    pub request_id: String,
    /// Source URL.
    pub url: String,
    /// Platform the request was dispatched to.
    pub platform: Platform,
    /// Files produced, in the order they were processed.
    pub files: Vec<PathBuf>,
    /// Whether the item produced output without a fatal error.
    pub success: bool,
    /// At least one file was kept without embedded metadata.
    pub degraded: bool,
    /// Error detail for failed items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall time spent on the item.
    pub elapsed_ms: u64,
}

impl AcquisitionResult {
    pub fn succeeded(request: &AcquisitionRequest, output: AcquisitionOutput, elapsed_ms: u64) -> Self {
        Self {
            request_id: request.id.clone(),
            url: request.url.clone(),
            platform: request.platform,
            files: output.files,
            success: true,
            degraded: output.degraded,
            error: None,
            elapsed_ms,
        }
    }

    pub fn failed(request: &AcquisitionRequest, error: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            request_id: request.id.clone(),
            url: request.url.clone(),
            platform: request.platform,
            files: Vec::new(),
            success: false,
            degraded: false,
            error: Some(error.into()),
            elapsed_ms,
        }
    }
}

/// What an adapter hands back for a successful acquisition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcquisitionOutput {
    /// Produced files.
    pub files: Vec<PathBuf>,
    /// Some files could not be tagged.
    pub degraded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_detect() {
        assert_eq!(
            Platform::detect("https://soundcloud.com/artist/track"),
            Some(Platform::SoundCloud)
        );
        assert_eq!(
            Platform::detect("https://open.spotify.com/track/abc?si=123"),
            Some(Platform::Spotify)
        );
        assert_eq!(
            Platform::detect("https://music.apple.com/us/album/x/1?i=2"),
            Some(Platform::AppleMusic)
        );
        assert_eq!(
            Platform::detect("www.soundcloud.com/a/b"),
            Some(Platform::SoundCloud)
        );
        assert_eq!(Platform::detect("https://example.com/track"), None);
        assert_eq!(Platform::detect(""), None);
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("soundcloud".parse::<Platform>().unwrap(), Platform::SoundCloud);
        assert_eq!("Spotify".parse::<Platform>().unwrap(), Platform::Spotify);
        assert_eq!("apple-music".parse::<Platform>().unwrap(), Platform::AppleMusic);
        assert!("deezer".parse::<Platform>().is_err());
    }

    #[test]
    fn test_audio_format() {
        assert_eq!(AudioFormat::Mp3.extension(), "mp3");
        assert_eq!(AudioFormat::Wav.to_string(), "WAV");
        assert_eq!("wave".parse::<AudioFormat>().unwrap(), AudioFormat::Wav);
        assert!(AudioFormat::Mp3.matches_path(std::path::Path::new("/a/Song.MP3")));
        assert!(!AudioFormat::Mp3.matches_path(std::path::Path::new("/a/Song.info.json")));
    }

    #[test]
    fn test_request_rejects_empty_url() {
        let err = AcquisitionRequest::new("   ", Platform::Spotify, AudioFormat::Mp3, "/tmp")
            .unwrap_err();
        assert_eq!(err, InvalidRequest::EmptyUrl);
        assert_eq!(err.to_string(), "Please enter a valid URL.");
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = AcquisitionRequest::new("u", Platform::Spotify, AudioFormat::Mp3, "/tmp").unwrap();
        let b = AcquisitionRequest::new("u", Platform::Spotify, AudioFormat::Mp3, "/tmp").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_request_detect() {
        let req = AcquisitionRequest::detect(
            " https://soundcloud.com/a/b ",
            AudioFormat::Wav,
            "/music",
        )
        .unwrap();
        assert_eq!(req.platform, Platform::SoundCloud);
        assert_eq!(req.url, "https://soundcloud.com/a/b");

        let err = AcquisitionRequest::detect("https://example.com", AudioFormat::Mp3, "/m")
            .unwrap_err();
        assert!(matches!(err, InvalidRequest::UnknownPlatform(_)));
    }

    #[test]
    fn test_result_serialization() {
        let req = AcquisitionRequest::new("u", Platform::AppleMusic, AudioFormat::Mp3, "/tmp")
            .unwrap();
        let result = AcquisitionResult::failed(&req, "boom", 12);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"platform\":\"applemusic\""));
        assert!(json.contains("\"error\":\"boom\""));
    }
}
