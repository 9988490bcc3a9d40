//! FFmpeg-based converter implementation.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::process::{ProcessRunner, Tool, ToolResolver};
use crate::sink::LogSink;

use super::error::ConverterError;
use super::traits::Converter;
use super::types::{ConversionJob, ConversionResult, PCM_CODEC, WAV_SAMPLE_RATE_HZ};

/// FFmpeg-based converter implementation.
pub struct FfmpegConverter {
    runner: Arc<dyn ProcessRunner>,
    resolver: ToolResolver,
}

impl FfmpegConverter {
    /// Creates a converter that runs ffmpeg through `runner`.
    pub fn new(runner: Arc<dyn ProcessRunner>, resolver: ToolResolver) -> Self {
        Self { runner, resolver }
    }

    /// Builds ffmpeg arguments for PCM WAV output.
    fn build_wav_args(input_path: &Path, output_path: &Path) -> Vec<String> {
        vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
            "-acodec".to_string(),
            PCM_CODEC.to_string(),
            "-ar".to_string(),
            WAV_SAMPLE_RATE_HZ.to_string(),
            output_path.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl Converter for FfmpegConverter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn convert(
        &self,
        job: ConversionJob,
        output: &dyn LogSink,
    ) -> Result<ConversionResult, ConverterError> {
        let start = Instant::now();

        if !job.input_path.exists() {
            return Err(ConverterError::InputNotFound {
                path: job.input_path,
            });
        }

        let args = Self::build_wav_args(&job.input_path, &job.output_path);
        let invocation = self.resolver.invocation(Tool::Ffmpeg, args);
        self.runner.run(&invocation, output).await?;

        // Verify output exists and get size
        let output_meta = tokio::fs::metadata(&job.output_path)
            .await
            .map_err(|_| ConverterError::OutputMissing {
                path: job.output_path.clone(),
            })?;

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Converted {} in {} ms",
            job.output_path.display(),
            duration_ms
        );

        Ok(ConversionResult {
            output_path: job.output_path,
            output_size_bytes: output_meta.len(),
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolsConfig;
    use crate::process::ProcessError;
    use crate::testing::{RecordingSinks, ScriptedProcessRunner, ScriptedStep};
    use tempfile::TempDir;

    fn converter(runner: Arc<ScriptedProcessRunner>, tools: &Path) -> FfmpegConverter {
        let config = ToolsConfig {
            bundled_dir: tools.to_path_buf(),
            ..Default::default()
        };
        FfmpegConverter::new(runner, ToolResolver::new(config).with_search_path(tools))
    }

    #[test]
    fn test_build_wav_args() {
        let args =
            FfmpegConverter::build_wav_args(Path::new("/in/a b.mp3"), Path::new("/in/a b.wav"));
        assert_eq!(
            args,
            vec![
                "-y",
                "-i",
                "/in/a b.mp3",
                "-acodec",
                "pcm_s16le",
                "-ar",
                "44100",
                "/in/a b.wav"
            ]
        );
    }

    #[tokio::test]
    async fn test_convert_runs_ffmpeg() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Song.mp3");
        std::fs::write(&input, b"mp3").unwrap();

        let runner = Arc::new(ScriptedProcessRunner::new());
        runner
            .push(ScriptedStep::success().creates(dir.path().join("Song.wav"), b"RIFF".to_vec()))
            .await;
        let sinks = RecordingSinks::new();

        let result = converter(runner.clone(), dir.path())
            .convert(ConversionJob::to_wav(&input), sinks.as_ref())
            .await
            .unwrap();

        assert_eq!(result.output_path, dir.path().join("Song.wav"));
        assert_eq!(result.output_size_bytes, 4);

        let calls = runner.invocations().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, std::path::PathBuf::from("ffmpeg"));
        assert_eq!(calls[0].arg_value("-acodec"), Some("pcm_s16le"));
    }

    #[tokio::test]
    async fn test_convert_missing_input() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(ScriptedProcessRunner::new());
        let sinks = RecordingSinks::new();

        let err = converter(runner.clone(), dir.path())
            .convert(ConversionJob::to_wav(dir.path().join("gone.mp3")), sinks.as_ref())
            .await
            .unwrap_err();

        assert!(matches!(err, ConverterError::InputNotFound { .. }));
        assert!(runner.invocations().await.is_empty());
    }

    #[tokio::test]
    async fn test_convert_without_output_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Song.mp3");
        std::fs::write(&input, b"mp3").unwrap();

        let runner = Arc::new(ScriptedProcessRunner::new());
        let sinks = RecordingSinks::new();

        let err = converter(runner, dir.path())
            .convert(ConversionJob::to_wav(&input), sinks.as_ref())
            .await
            .unwrap_err();
        assert!(matches!(err, ConverterError::OutputMissing { .. }));
    }

    #[tokio::test]
    async fn test_convert_process_failure() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Song.mp3");
        std::fs::write(&input, b"mp3").unwrap();

        let runner = Arc::new(ScriptedProcessRunner::new());
        runner.push(ScriptedStep::failure(1, "Invalid data")).await;
        let sinks = RecordingSinks::new();

        let err = converter(runner, dir.path())
            .convert(ConversionJob::to_wav(&input), sinks.as_ref())
            .await
            .unwrap_err();
        assert!(matches!(
            err.process_error(),
            Some(ProcessError::CommandFailed { .. })
        ));
    }
}
