//! Output directory scanning.
//!
//! Adapters snapshot the directory before running a tool and afterwards
//! keep only files that were not there before.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::types::AudioFormat;

/// Files in `dir` with `format`'s extension.
pub(crate) async fn snapshot(dir: &Path, format: AudioFormat) -> std::io::Result<HashSet<PathBuf>> {
    let mut found = HashSet::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if format.matches_path(&path) && entry.file_type().await?.is_file() {
            found.insert(path);
        }
    }
    Ok(found)
}

/// Files with `format`'s extension that are absent from `before`, sorted.
pub(crate) async fn new_files(
    dir: &Path,
    format: AudioFormat,
    before: &HashSet<PathBuf>,
) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = snapshot(dir, format)
        .await?
        .into_iter()
        .filter(|p| !before.contains(p))
        .collect();
    files.sort();
    Ok(files)
}

/// Removes `path`, ignoring a missing file.
pub(crate) async fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// File name for log lines.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
