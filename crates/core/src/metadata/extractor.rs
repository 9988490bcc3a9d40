//! Metadata extraction from yt-dlp sidecar files.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::types::{TrackMetadata, UNKNOWN_ALBUM, UNKNOWN_ARTIST};

/// Sidecar location for a media file: `<stem>.info.json` in the same directory.
pub fn sidecar_path(media: &Path) -> PathBuf {
    media.with_file_name(format!("{}.info.json", file_stem(media)))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Derives metadata for `primary` from `sidecar`, falling back to the file
/// name. Never fails.
pub fn extract(primary: &Path, sidecar: Option<&Path>) -> TrackMetadata {
    let fallback = || TrackMetadata::with_title(file_stem(primary));

    let Some(sidecar) = sidecar.filter(|p| p.exists()) else {
        return fallback();
    };

    let info = match std::fs::read(sidecar)
        .map_err(|e| e.to_string())
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).map_err(|e| e.to_string()))
    {
        Ok(Value::Object(info)) => info,
        Ok(_) => {
            debug!("Sidecar {} is not a JSON object", sidecar.display());
            return fallback();
        }
        Err(e) => {
            debug!("Ignoring unreadable sidecar {}: {}", sidecar.display(), e);
            return fallback();
        }
    };

    let title = text(&info, "title")
        .or_else(|| text(&info, "uploader"))
        .or_else(|| text(&info, "channel"))
        .unwrap_or_else(|| file_stem(primary));
    let artist = text(&info, "artist")
        .or_else(|| text(&info, "uploader"))
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
    let album = text(&info, "album").unwrap_or_else(|| UNKNOWN_ALBUM.to_string());

    let year = match info.get("release_year") {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    };

    TrackMetadata {
        title,
        artist,
        album,
        year,
        artwork_url: text(&info, "thumbnail"),
    }
}

/// Non-empty string field.
fn text(info: &Map<String, Value>, key: &str) -> Option<String> {
    info.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
