//! `--check`: where each external tool would be run from.

use trackgrab_core::{Tool, ToolLocation, ToolResolver};

/// One line per tool, e.g. `ffmpeg: found in PATH at /usr/bin/ffmpeg`.
pub fn report(resolver: &ToolResolver) -> (Vec<String>, bool) {
    let mut all_available = true;
    let lines = Tool::ALL
        .iter()
        .map(|tool| {
            let location = resolver.locate(*tool);
            all_available &= location.is_available();
            line(*tool, &location)
        })
        .collect();
    (lines, all_available)
}

fn line(tool: Tool, location: &ToolLocation) -> String {
    format!("{}: {}", tool, location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use trackgrab_core::ToolsConfig;

    #[test]
    fn test_report_without_any_tools() {
        let dir = TempDir::new().unwrap();
        let resolver = ToolResolver::new(ToolsConfig {
            bundled_dir: dir.path().join("tools"),
            ..Default::default()
        })
        .with_search_path(dir.path().join("bin"));

        let (lines, ok) = report(&resolver);
        assert!(!ok);
        assert_eq!(lines[0], "ffmpeg: not found");
        assert!(lines[1].starts_with("yt-dlp: runs as module: "));
        assert!(lines[1].ends_with("-m yt_dlp"));
        assert!(lines[2].ends_with("-m spotdl"));
    }
}
