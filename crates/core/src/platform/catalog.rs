//! Catalog adapter (Spotify, Apple Music) backed by spotdl.
//!
//! spotdl matches catalog entries to audio sources and writes tagged MP3s
//! into its working directory; it has no output template. The adapter runs
//! it inside a [`WorkingDirGuard`] and optionally converts to WAV, carrying
//! the tags over into a RIFF INFO chunk.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::converter::{ConversionJob, Converter};
use crate::metadata::{TagEmbedder, TagError};
use crate::metrics;
use crate::process::{ProcessRunner, Tool, ToolResolver};
use crate::sink::Sinks;

use super::error::AcquisitionError;
use super::scan;
use super::traits::PlatformAdapter;
use super::types::{AcquisitionOutput, AcquisitionRequest, AudioFormat, Platform};
use super::workdir::WorkingDirGuard;

/// spotdl-based adapter, parametrized by platform.
pub struct CatalogAdapter {
    platform: [Platform; 1],
    runner: Arc<dyn ProcessRunner>,
    resolver: ToolResolver,
    converter: Arc<dyn Converter>,
    embedder: TagEmbedder,
}

impl CatalogAdapter {
    pub fn new(
        platform: Platform,
        runner: Arc<dyn ProcessRunner>,
        resolver: ToolResolver,
        converter: Arc<dyn Converter>,
    ) -> Self {
        Self {
            platform: [platform],
            runner,
            resolver,
            converter,
            embedder: TagEmbedder::new(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform[0]
    }

    /// Builds spotdl arguments. Downloads are always MP3; WAV is produced
    /// afterwards by conversion.
    fn build_args(&self, url: &str) -> Vec<String> {
        vec![
            "--format".to_string(),
            "mp3".to_string(),
            "--bitrate".to_string(),
            "320k".to_string(),
            "--ffmpeg".to_string(),
            self.resolver
                .program_path(Tool::Ffmpeg)
                .to_string_lossy()
                .to_string(),
            url.to_string(),
        ]
    }

    /// Copies the MP3's tags onto the converted WAV.
    fn transfer_tags(&self, mp3: &Path, wav: &Path) -> Result<(), TagError> {
        let metadata = self.embedder.read(mp3)?;
        self.embedder.embed(wav, AudioFormat::Wav, &metadata, None)
    }

    /// Converts every MP3 to WAV. Returns the WAV paths and whether any tag
    /// transfer failed.
    async fn convert_all(
        &self,
        mp3s: &[PathBuf],
        sinks: &Sinks,
    ) -> Result<(Vec<PathBuf>, bool), AcquisitionError> {
        let mut wavs = Vec::with_capacity(mp3s.len());
        let mut degraded = false;

        for mp3 in mp3s {
            sinks.log(&format!("Converting to WAV: {}", scan::display_name(mp3)));

            let result = match self
                .converter
                .convert(ConversionJob::to_wav(mp3), sinks.log.as_ref())
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    sinks.error(&e.to_string());
                    return Err(e.into());
                }
            };

            if let Err(e) = self.transfer_tags(mp3, &result.output_path) {
                sinks.log(&format!("Warning: Could not transfer metadata: {}", e));
                metrics::TAG_FAILURES
                    .with_label_values(&[AudioFormat::Wav.extension()])
                    .inc();
                degraded = true;
            }

            scan::remove_if_exists(mp3).await?;
            sinks.log(&format!("Saved: {}", scan::display_name(&result.output_path)));
            wavs.push(result.output_path);
        }

        Ok((wavs, degraded))
    }
}

#[async_trait]
impl PlatformAdapter for CatalogAdapter {
    fn name(&self) -> &str {
        "spotdl"
    }

    fn platforms(&self) -> &[Platform] {
        &self.platform
    }

    async fn acquire(
        &self,
        request: &AcquisitionRequest,
        sinks: &Sinks,
    ) -> Result<AcquisitionOutput, AcquisitionError> {
        let platform = self.platform();
        sinks.status(&format!("Downloading from {}...", platform));
        sinks.log(&format!("URL: {}", request.url));

        tokio::fs::create_dir_all(&request.output_dir).await?;
        // Absolute, so paths stay valid once the guard restores the cwd.
        let dir = tokio::fs::canonicalize(&request.output_dir).await?;

        let _cwd = WorkingDirGuard::enter(&dir).await?;
        let before = scan::snapshot(&dir, AudioFormat::Mp3).await?;

        let invocation = self
            .resolver
            .invocation(Tool::SpotDl, self.build_args(&request.url));
        if let Err(e) = self.runner.run(&invocation, sinks.log.as_ref()).await {
            sinks.error(&e.to_string());
            return Err(e.into());
        }

        sinks.status("Processing files...");
        let mp3s = scan::new_files(&dir, AudioFormat::Mp3, &before).await?;
        if mp3s.is_empty() {
            sinks.error("No files found after download.");
            return Err(AcquisitionError::NoOutputProduced {
                platform,
                dir: request.output_dir.clone(),
            });
        }

        let (files, degraded) = match request.format {
            AudioFormat::Wav => self.convert_all(&mp3s, sinks).await?,
            AudioFormat::Mp3 => {
                for mp3 in &mp3s {
                    sinks.log(&format!("Saved: {}", scan::display_name(mp3)));
                }
                (mp3s, false)
            }
        };

        metrics::FILES_PRODUCED
            .with_label_values(&[platform.as_str(), request.format.extension()])
            .inc_by(files.len() as u64);

        sinks.status(&format!("Downloaded {} file(s)", files.len()));
        info!("{}: {} file(s) in {}", platform, files.len(), dir.display());
        if degraded {
            warn!("{}: some files were kept without metadata", platform);
        }

        Ok(AcquisitionOutput { files, degraded })
    }
}
