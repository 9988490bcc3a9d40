//! Child process execution with streamed output.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::sink::LogSink;

use super::error::ProcessError;
use super::types::ProcessInvocation;

/// Runs external commands.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs `invocation` to completion.
    ///
    /// Every stdout line is forwarded to `output` as it arrives, with
    /// trailing whitespace stripped. Returns `CommandFailed` with the
    /// captured stderr on a nonzero exit.
    async fn run(
        &self,
        invocation: &ProcessInvocation,
        output: &dyn LogSink,
    ) -> Result<(), ProcessError>;
}

/// [`ProcessRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    /// Reads the whole stream, decoding invalid UTF-8 lossily.
    async fn drain_lossy<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<String> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Forwards one raw line. Carriage returns split progress updates that
    /// tools redraw in place.
    fn forward_line(raw: &[u8], output: &dyn LogSink) {
        let text = String::from_utf8_lossy(raw);
        for segment in text.split('\r') {
            let segment = segment.trim_end();
            if !segment.is_empty() {
                output.log(segment);
            }
        }
    }
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(
        &self,
        invocation: &ProcessInvocation,
        output: &dyn LogSink,
    ) -> Result<(), ProcessError> {
        debug!("Running: {}", invocation.command_line());

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| ProcessError::LaunchFailed {
            program: invocation.program.clone(),
            source,
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("stderr was not captured"))?;

        // Drained concurrently so a chatty stderr cannot fill its pipe and
        // stall the child while we wait on stdout.
        let stderr_task = tokio::spawn(Self::drain_lossy(stderr));

        let mut reader = BufReader::new(stdout);
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }
            Self::forward_line(&line, output);
        }

        let status = child.wait().await?;
        let stderr = stderr_task
            .await
            .map_err(std::io::Error::other)??;

        if status.success() {
            debug!("Command finished: {}", invocation.program.display());
            Ok(())
        } else {
            Err(ProcessError::command_failed(
                invocation.command_line(),
                status.code(),
                stderr.trim_end(),
            ))
        }
    }
}
