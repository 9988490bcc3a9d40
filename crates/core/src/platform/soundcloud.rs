//! SoundCloud adapter backed by yt-dlp.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::artwork::ArtworkFetcher;
use crate::metadata::{extract, sidecar_path, TagEmbedder};
use crate::metrics;
use crate::process::{ProcessRunner, Tool, ToolResolver};
use crate::sink::Sinks;

use super::error::AcquisitionError;
use super::progress::ProgressLog;
use super::scan;
use super::traits::PlatformAdapter;
use super::types::{AcquisitionOutput, AcquisitionRequest, AudioFormat, Platform};

/// Downloads single SoundCloud tracks with yt-dlp, then tags them from the
/// info sidecar and fetched thumbnail.
pub struct SoundCloudAdapter {
    runner: Arc<dyn ProcessRunner>,
    resolver: ToolResolver,
    artwork: Arc<dyn ArtworkFetcher>,
    embedder: TagEmbedder,
}

impl SoundCloudAdapter {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        resolver: ToolResolver,
        artwork: Arc<dyn ArtworkFetcher>,
    ) -> Self {
        Self {
            runner,
            resolver,
            artwork,
            embedder: TagEmbedder::new(),
        }
    }

    /// Builds yt-dlp arguments.
    fn build_args(&self, request: &AcquisitionRequest) -> Vec<String> {
        let template = request.output_dir.join("%(title)s.%(ext)s");
        let mut args: Vec<String> = [
            "--extract-audio",
            "--audio-format",
            request.format.extension(),
            "--audio-quality",
            "0",
            "--embed-thumbnail",
            "--write-info-json",
            "--add-metadata",
            "--no-playlist",
            "--ignore-errors",
            "--no-overwrites",
            "--continue",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        args.extend([
            "--ffmpeg-location".to_string(),
            self.resolver
                .program_path(Tool::Ffmpeg)
                .to_string_lossy()
                .to_string(),
            "-o".to_string(),
            template.to_string_lossy().to_string(),
            request.url.clone(),
        ]);

        // yt-dlp's own MP3 encode does not reliably hit 320k.
        if request.format == AudioFormat::Mp3 {
            args.extend([
                "--postprocessor-args".to_string(),
                "ffmpeg:-b:a 320k -ar 44100".to_string(),
            ]);
        }

        args
    }

    /// Tags one downloaded file. Returns `false` when the file stays
    /// untagged. Artwork and sidecar are removed either way.
    async fn post_process(&self, file: &Path, format: AudioFormat, sinks: &Sinks) -> bool {
        let sidecar = sidecar_path(file);
        let metadata = extract(file, Some(&sidecar));

        // WAV output is never tagged, so there is nothing to attach artwork to.
        let artwork_path = file.with_extension("jpg");
        let artwork_url = match format {
            AudioFormat::Mp3 => metadata.artwork_url.as_deref(),
            AudioFormat::Wav => None,
        };
        let artwork = match artwork_url {
            Some(url) if self.artwork.fetch(url, &artwork_path).await => {
                Some(artwork_path.as_path())
            }
            _ => None,
        };

        let tagged = match format {
            AudioFormat::Mp3 => match self.embedder.embed(file, format, &metadata, artwork) {
                Ok(()) => true,
                Err(e) => {
                    sinks.log(&format!("Warning: {}", e));
                    metrics::TAG_FAILURES
                        .with_label_values(&[format.extension()])
                        .inc();
                    false
                }
            },
            AudioFormat::Wav => true,
        };

        for leftover in [artwork_path.as_path(), sidecar.as_path()] {
            if let Err(e) = scan::remove_if_exists(leftover).await {
                warn!("Could not remove {}: {}", leftover.display(), e);
            }
        }

        tagged
    }
}

#[async_trait]
impl PlatformAdapter for SoundCloudAdapter {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    fn platforms(&self) -> &[Platform] {
        &[Platform::SoundCloud]
    }

    async fn acquire(
        &self,
        request: &AcquisitionRequest,
        sinks: &Sinks,
    ) -> Result<AcquisitionOutput, AcquisitionError> {
        sinks.status(&format!("Downloading from {}...", Platform::SoundCloud));
        sinks.log(&format!("URL: {}", request.url));

        tokio::fs::create_dir_all(&request.output_dir).await?;
        let before = scan::snapshot(&request.output_dir, request.format).await?;

        let invocation = self.resolver.invocation(Tool::YtDlp, self.build_args(request));
        let output = ProgressLog::new(sinks.log.as_ref(), "yt-dlp");
        if let Err(e) = self.runner.run(&invocation, &output).await {
            sinks.error(&e.to_string());
            return Err(e.into());
        }

        sinks.status("Processing files...");
        let files = scan::new_files(&request.output_dir, request.format, &before).await?;
        if files.is_empty() {
            sinks.error("No files were downloaded.");
            return Err(AcquisitionError::NoOutputProduced {
                platform: Platform::SoundCloud,
                dir: request.output_dir.clone(),
            });
        }

        let mut degraded = false;
        for file in &files {
            if !self.post_process(file, request.format, sinks).await {
                degraded = true;
            }
        }

        metrics::FILES_PRODUCED
            .with_label_values(&[Platform::SoundCloud.as_str(), request.format.extension()])
            .inc_by(files.len() as u64);

        sinks.status(&format!("Downloaded {} file(s)", files.len()));
        for file in &files {
            sinks.log(&format!("Saved: {}", scan::display_name(file)));
        }
        info!("SoundCloud: {} file(s) in {}", files.len(), request.output_dir.display());

        Ok(AcquisitionOutput { files, degraded })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolsConfig;
    use crate::metadata::TrackMetadata;
    use crate::process::ProcessInvocation;
    use crate::testing::{
        fixtures, RecordingSinks, ScriptedProcessRunner, ScriptedStep, StubArtworkFetcher,
    };
    use tempfile::TempDir;

    struct Harness {
        runner: Arc<ScriptedProcessRunner>,
        artwork: Arc<StubArtworkFetcher>,
        sinks: Arc<RecordingSinks>,
        adapter: SoundCloudAdapter,
        dir: TempDir,
    }

    impl Harness {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let tools = ToolsConfig {
                bundled_dir: dir.path().join("tools"),
                ..Default::default()
            };
            let resolver = ToolResolver::new(tools).with_search_path(dir.path().join("bin"));
            let runner = Arc::new(ScriptedProcessRunner::new());
            let artwork = Arc::new(StubArtworkFetcher::succeeding());
            let adapter = SoundCloudAdapter::new(runner.clone(), resolver, artwork.clone());
            Self {
                runner,
                artwork,
                sinks: RecordingSinks::new(),
                adapter,
                dir,
            }
        }

        fn out(&self) -> std::path::PathBuf {
            self.dir.path().join("out")
        }

        fn request(&self, format: AudioFormat) -> AcquisitionRequest {
            AcquisitionRequest::new(
                "https://soundcloud.com/artist/track",
                Platform::SoundCloud,
                format,
                self.out(),
            )
            .unwrap()
        }

        async fn acquire(
            &self,
            format: AudioFormat,
        ) -> Result<AcquisitionOutput, AcquisitionError> {
            self.adapter
                .acquire(&self.request(format), &self.sinks.sinks())
                .await
        }

        async fn last_invocation(&self) -> ProcessInvocation {
            self.runner.invocations().await.pop().unwrap()
        }
    }

    const SIDECAR: &[u8] =
        br#"{"title":"X","uploader":"Y","release_year":2001,"thumbnail":"http://a/b.jpg"}"#;

    #[tokio::test]
    async fn test_mp3_arguments() {
        let h = Harness::new();
        let _ = h.acquire(AudioFormat::Mp3).await;

        let inv = h.last_invocation().await;
        assert_eq!(inv.args[0..2], ["-m".to_string(), "yt_dlp".to_string()]);
        assert_eq!(inv.arg_value("--audio-format"), Some("mp3"));
        assert_eq!(inv.arg_value("--audio-quality"), Some("0"));
        assert_eq!(inv.arg_value("--ffmpeg-location"), Some("ffmpeg"));
        assert_eq!(
            inv.arg_value("--postprocessor-args"),
            Some("ffmpeg:-b:a 320k -ar 44100")
        );
        for flag in [
            "--extract-audio",
            "--embed-thumbnail",
            "--write-info-json",
            "--add-metadata",
            "--no-playlist",
            "--ignore-errors",
            "--no-overwrites",
            "--continue",
        ] {
            assert!(inv.has_arg(flag), "missing {}", flag);
        }
        let template = h.out().join("%(title)s.%(ext)s");
        assert_eq!(inv.arg_value("-o"), Some(template.to_str().unwrap()));
        assert_eq!(inv.args.last().unwrap(), "ffmpeg:-b:a 320k -ar 44100");
        assert!(inv.has_arg("https://soundcloud.com/artist/track"));
    }

    #[tokio::test]
    async fn test_wav_has_no_postprocessor_args() {
        let h = Harness::new();
        let _ = h.acquire(AudioFormat::Wav).await;

        let inv = h.last_invocation().await;
        assert_eq!(inv.arg_value("--audio-format"), Some("wav"));
        assert!(!inv.has_arg("--postprocessor-args"));
        assert_eq!(inv.args.last().unwrap(), "https://soundcloud.com/artist/track");
    }

    #[tokio::test]
    async fn test_tags_from_sidecar_and_cleans_up() {
        let h = Harness::new();
        let song = h.out().join("X.mp3");
        h.runner
            .push(
                ScriptedStep::success()
                    .line("[download] 100% of 1MiB")
                    .creates(&song, fixtures::mp3_bytes())
                    .creates(h.out().join("X.info.json"), SIDECAR.to_vec()),
            )
            .await;

        let output = h.acquire(AudioFormat::Mp3).await.unwrap();
        assert_eq!(output.files, vec![song.clone()]);
        assert!(!output.degraded);

        let tags = TagEmbedder::new().read(&song).unwrap();
        assert_eq!(
            tags,
            TrackMetadata {
                title: "X".to_string(),
                artist: "Y".to_string(),
                album: "Unknown Album".to_string(),
                year: Some("2001".to_string()),
                artwork_url: None,
            }
        );
        assert!(TagEmbedder::new().has_front_cover(&song).unwrap());
        assert_eq!(h.artwork.requests().await, vec!["http://a/b.jpg".to_string()]);

        assert!(!h.out().join("X.jpg").exists());
        assert!(!h.out().join("X.info.json").exists());

        assert_eq!(
            h.sinks.statuses(),
            vec![
                "Downloading from SoundCloud...",
                "Processing files...",
                "Downloaded 1 file(s)"
            ]
        );
        let logs = h.sinks.logs();
        assert_eq!(logs[0], "URL: https://soundcloud.com/artist/track");
        assert!(logs.contains(&"[download] 100% of 1MiB".to_string()));
        assert!(logs.contains(&"Saved: X.mp3".to_string()));
    }

    #[tokio::test]
    async fn test_artwork_failure_is_not_fatal() {
        let h = Harness::new();
        h.artwork.set_succeed(false).await;
        let song = h.out().join("X.mp3");
        h.runner
            .push(
                ScriptedStep::success()
                    .creates(&song, fixtures::mp3_bytes())
                    .creates(h.out().join("X.info.json"), SIDECAR.to_vec()),
            )
            .await;

        let output = h.acquire(AudioFormat::Mp3).await.unwrap();
        assert!(!output.degraded);
        assert_eq!(TagEmbedder::new().read(&song).unwrap().title, "X");
        assert!(!TagEmbedder::new().has_front_cover(&song).unwrap());
        assert!(h.sinks.errors().is_empty());
    }

    #[tokio::test]
    async fn test_tag_failure_degrades_but_keeps_file() {
        let h = Harness::new();
        let song = h.out().join("Broken.mp3");
        h.runner
            .push(
                ScriptedStep::success()
                    .creates(&song, b"not really audio".to_vec())
                    .creates(h.out().join("Broken.info.json"), SIDECAR.to_vec()),
            )
            .await;

        let output = h.acquire(AudioFormat::Mp3).await.unwrap();
        assert!(output.degraded);
        assert!(song.exists());
        assert!(!h.out().join("Broken.info.json").exists());
        assert!(!h.out().join("Broken.jpg").exists());
        assert!(h
            .sinks
            .logs()
            .iter()
            .any(|l| l.starts_with("Warning: failed to embed metadata")));
    }

    #[tokio::test]
    async fn test_only_new_files_are_processed() {
        let h = Harness::new();
        std::fs::create_dir_all(h.out()).unwrap();
        std::fs::write(h.out().join("Old.mp3"), b"old").unwrap();
        let song = h.out().join("New.mp3");
        h.runner
            .push(ScriptedStep::success().creates(&song, fixtures::mp3_bytes()))
            .await;

        let output = h.acquire(AudioFormat::Mp3).await.unwrap();
        assert_eq!(output.files, vec![song]);
        assert_eq!(std::fs::read(h.out().join("Old.mp3")).unwrap(), b"old");
        // No sidecar: filename fallback, no artwork request.
        assert!(h.artwork.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_no_output_is_reported() {
        let h = Harness::new();
        let err = h.acquire(AudioFormat::Mp3).await.unwrap_err();

        assert!(matches!(
            err,
            AcquisitionError::NoOutputProduced {
                platform: Platform::SoundCloud,
                ..
            }
        ));
        assert_eq!(h.sinks.errors(), vec!["No files were downloaded."]);
        assert!(h.out().is_dir());
    }

    #[tokio::test]
    async fn test_command_failure_is_reported() {
        let h = Harness::new();
        h.runner
            .push(ScriptedStep::failure(1, "ERROR: Unable to download JSON metadata"))
            .await;

        let err = h.acquire(AudioFormat::Mp3).await.unwrap_err();
        assert!(matches!(err, AcquisitionError::Process(_)));

        let errors = h.sinks.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Command failed: python3 -m yt_dlp --extract-audio"));
        assert!(errors[0].ends_with("\nERROR: Unable to download JSON metadata"));
        assert!(!h.sinks.statuses().contains(&"Processing files...".to_string()));
    }

    #[tokio::test]
    async fn test_wav_files_are_not_tagged() {
        let h = Harness::new();
        let song = h.out().join("X.wav");
        std::fs::create_dir_all(h.out()).unwrap();
        fixtures::write_wav(&song).unwrap();
        // Pre-existing file would be ignored, so recreate it through the step.
        let bytes = std::fs::read(&song).unwrap();
        std::fs::remove_file(&song).unwrap();
        h.runner
            .push(
                ScriptedStep::success()
                    .creates(&song, bytes)
                    .creates(h.out().join("X.info.json"), SIDECAR.to_vec()),
            )
            .await;

        let output = h.acquire(AudioFormat::Wav).await.unwrap();
        assert!(!output.degraded);
        assert_eq!(
            TagEmbedder::new().read(&song).unwrap(),
            TrackMetadata::with_title("X")
        );
        assert!(h.artwork.requests().await.is_empty());
        assert!(!h.out().join("X.jpg").exists());
        assert!(!h.out().join("X.info.json").exists());
    }
}
