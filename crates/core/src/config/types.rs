use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::orchestrator::OrchestratorConfig;
use crate::platform::{AudioFormat, Platform};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub artwork: ArtworkConfig,
    #[serde(default)]
    pub downloads: DownloadsConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// Where external tools are looked up.
///
/// Resolution order: explicit per-tool path, bundled binary under
/// `bundled_dir`, system PATH, then `<python> -m <module>` for tools that
/// also ship as Python modules.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Directory holding bundled tool binaries.
    #[serde(default = "default_bundled_dir")]
    pub bundled_dir: PathBuf,
    /// Explicit ffmpeg binary.
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
    /// Explicit yt-dlp binary.
    #[serde(default)]
    pub yt_dlp_path: Option<PathBuf>,
    /// Explicit spotdl binary.
    #[serde(default)]
    pub spotdl_path: Option<PathBuf>,
    /// Interpreter used for the module fallback.
    #[serde(default = "default_python")]
    pub python: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            bundled_dir: default_bundled_dir(),
            ffmpeg_path: None,
            yt_dlp_path: None,
            spotdl_path: None,
            python: default_python(),
        }
    }
}

fn default_bundled_dir() -> PathBuf {
    PathBuf::from("tools")
}

fn default_python() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("python")
    } else {
        PathBuf::from("python3")
    }
}

/// Artwork download settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtworkConfig {
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_artwork_timeout")]
    pub timeout_secs: u64,
    /// User-Agent header sent with artwork requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_artwork_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_artwork_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("trackgrab/{}", env!("CARGO_PKG_VERSION"))
}

/// Defaults applied to requests that don't specify their own values.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadsConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub default_format: AudioFormat,
    #[serde(default = "default_platform")]
    pub default_platform: Platform,
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_format: AudioFormat::default(),
            default_platform: default_platform(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_platform() -> Platform {
    Platform::SoundCloud
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.tools.bundled_dir, PathBuf::from("tools"));
        assert!(config.tools.ffmpeg_path.is_none());
        assert_eq!(config.artwork.timeout_secs, 10);
        assert_eq!(config.downloads.output_dir, PathBuf::from("downloads"));
        assert_eq!(config.downloads.default_format, AudioFormat::Mp3);
        assert_eq!(config.downloads.default_platform, Platform::SoundCloud);
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[tools]
bundled_dir = "/opt/trackgrab/bin"
ffmpeg_path = "/usr/local/bin/ffmpeg"
python = "/usr/bin/python3.12"

[artwork]
timeout_secs = 5
user_agent = "test-agent"

[downloads]
output_dir = "/music/incoming"
default_format = "wav"
default_platform = "applemusic"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.tools.bundled_dir, PathBuf::from("/opt/trackgrab/bin"));
        assert_eq!(
            config.tools.ffmpeg_path,
            Some(PathBuf::from("/usr/local/bin/ffmpeg"))
        );
        assert!(config.tools.spotdl_path.is_none());
        assert_eq!(config.tools.python, PathBuf::from("/usr/bin/python3.12"));
        assert_eq!(config.artwork.timeout_secs, 5);
        assert_eq!(config.artwork.user_agent, "test-agent");
        assert_eq!(config.downloads.default_format, AudioFormat::Wav);
        assert_eq!(config.downloads.default_platform, Platform::AppleMusic);
    }

    #[test]
    fn test_deserialize_unknown_format_fails() {
        let toml = r#"
[downloads]
default_format = "flac"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }
}
