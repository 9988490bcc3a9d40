//! Command-line arguments and request building.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::warn;

use trackgrab_core::{AcquisitionRequest, AudioFormat, DownloadsConfig, Platform};

/// Download tracks from SoundCloud, Spotify and Apple Music with clean tags.
#[derive(Debug, Parser)]
#[command(name = "trackgrab", version, about)]
pub struct Cli {
    /// Track or playlist URLs.
    pub urls: Vec<String>,

    /// Platform for every URL (detected from the host when omitted).
    #[arg(short, long, value_parser = parse_platform)]
    pub platform: Option<Platform>,

    /// Output format: mp3 or wav.
    #[arg(short, long, value_parser = parse_format)]
    pub format: Option<AudioFormat>,

    /// Output directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file.
    #[arg(short, long, default_value = "trackgrab.toml")]
    pub config: PathBuf,

    /// Read more URLs from a file, one per line. `#` starts a comment.
    #[arg(short, long)]
    pub input_file: Option<PathBuf>,

    /// Report where each external tool would be run from, then exit.
    #[arg(long)]
    pub check: bool,

    /// Print Prometheus metrics after the batch.
    #[arg(long)]
    pub metrics: bool,
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    s.parse()
}

fn parse_format(s: &str) -> Result<AudioFormat, String> {
    s.parse()
}

impl Cli {
    /// Every URL to process: positional ones first, then the input file's.
    pub fn all_urls(&self) -> Result<Vec<String>> {
        let mut urls: Vec<String> = self
            .urls
            .iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        if let Some(path) = &self.input_file {
            urls.extend(read_url_file(path)?);
        }
        Ok(urls)
    }

    /// Builds one request per URL, filling gaps from `defaults`.
    pub fn requests(&self, defaults: &DownloadsConfig) -> Result<Vec<AcquisitionRequest>> {
        let urls = self.all_urls()?;
        if urls.is_empty() {
            bail!("no URLs given");
        }

        let format = self.format.unwrap_or(defaults.default_format);
        let output_dir = self
            .output
            .clone()
            .unwrap_or_else(|| defaults.output_dir.clone());

        urls.into_iter()
            .map(|url| {
                let platform = match self.platform.or_else(|| Platform::detect(&url)) {
                    Some(platform) => platform,
                    None => {
                        warn!(
                            "Could not detect platform for {}, using {}",
                            url, defaults.default_platform
                        );
                        defaults.default_platform
                    }
                };
                AcquisitionRequest::new(url.as_str(), platform, format, output_dir.clone())
                    .with_context(|| format!("invalid request for {:?}", url))
            })
            .collect()
    }
}

/// Reads URLs from `path`, skipping blank lines and `#` comments.
pub fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL list {:?}", path))?;
    Ok(parse_url_list(&content))
}

fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
