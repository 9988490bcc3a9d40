//! Scripted process runner for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::process::{ProcessError, ProcessInvocation, ProcessRunner};
use crate::sink::LogSink;

#[derive(Debug, Clone, Default)]
enum Outcome {
    #[default]
    Success,
    Failure {
        code: i32,
        stderr: String,
    },
    LaunchFailure,
}

/// What one scripted invocation does: the lines it prints, the files it
/// leaves behind and how it exits.
#[derive(Debug, Clone, Default)]
pub struct ScriptedStep {
    lines: Vec<String>,
    files: Vec<(PathBuf, Vec<u8>)>,
    outcome: Outcome,
}

impl ScriptedStep {
    /// Exits with status 0.
    pub fn success() -> Self {
        Self::default()
    }

    /// Exits with `code`, writing `stderr`.
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failure {
                code,
                stderr: stderr.into(),
            },
            ..Self::default()
        }
    }

    /// Cannot be spawned at all.
    pub fn launch_failure() -> Self {
        Self {
            outcome: Outcome::LaunchFailure,
            ..Self::default()
        }
    }

    /// Prints `line` on stdout.
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Writes `bytes` to `path` before exiting. Relative paths resolve
    /// against the invocation's working directory, or the process one.
    pub fn creates(mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.push((path.into(), bytes.into()));
        self
    }
}

/// [`ProcessRunner`] that replays queued [`ScriptedStep`]s in order.
///
/// Calls beyond the script succeed silently. Every invocation is recorded
/// along with the directory it effectively ran in.
#[derive(Debug, Default)]
pub struct ScriptedProcessRunner {
    steps: Arc<RwLock<VecDeque<ScriptedStep>>>,
    invocations: Arc<RwLock<Vec<ProcessInvocation>>>,
    working_dirs: Arc<RwLock<Vec<PathBuf>>>,
}

impl ScriptedProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the behaviour of the next unscripted call.
    pub async fn push(&self, step: ScriptedStep) {
        self.steps.write().await.push_back(step);
    }

    /// Invocations received so far.
    pub async fn invocations(&self) -> Vec<ProcessInvocation> {
        self.invocations.read().await.clone()
    }

    /// Effective working directory of each invocation.
    pub async fn working_dirs(&self) -> Vec<PathBuf> {
        self.working_dirs.read().await.clone()
    }

    /// Steps not yet consumed.
    pub async fn pending(&self) -> usize {
        self.steps.read().await.len()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedProcessRunner {
    async fn run(
        &self,
        invocation: &ProcessInvocation,
        output: &dyn LogSink,
    ) -> Result<(), ProcessError> {
        let base = match &invocation.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        self.invocations.write().await.push(invocation.clone());
        self.working_dirs.write().await.push(base.clone());

        let step = self.steps.write().await.pop_front().unwrap_or_default();

        if let Outcome::LaunchFailure = step.outcome {
            return Err(ProcessError::LaunchFailed {
                program: invocation.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted launch failure"),
            });
        }

        for line in &step.lines {
            output.log(line);
        }

        for (path, bytes) in step.files {
            let path = if path.is_absolute() {
                path
            } else {
                base.join(path)
            };
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, bytes).await?;
        }

        match step.outcome {
            Outcome::Failure { code, stderr } => Err(ProcessError::command_failed(
                invocation.command_line(),
                Some(code),
                stderr,
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSinks;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_replays_steps_in_order() {
        let dir = TempDir::new().unwrap();
        let runner = ScriptedProcessRunner::new();
        runner
            .push(ScriptedStep::success().line("hello").creates("a.txt", b"A".to_vec()))
            .await;
        runner.push(ScriptedStep::failure(4, "bad")).await;
        let sinks = RecordingSinks::new();
        let inv = ProcessInvocation::new("tool", vec![]).with_working_dir(dir.path());

        runner.run(&inv, sinks.as_ref()).await.unwrap();
        let err = runner.run(&inv, sinks.as_ref()).await.unwrap_err();
        runner.run(&inv, sinks.as_ref()).await.unwrap();

        assert!(matches!(err, ProcessError::CommandFailed { code: Some(4), .. }));
        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"A");
        assert_eq!(sinks.logs(), vec!["hello"]);
        assert_eq!(runner.invocations().await.len(), 3);
        assert_eq!(runner.pending().await, 0);
    }

    #[tokio::test]
    async fn test_launch_failure() {
        let runner = ScriptedProcessRunner::new();
        runner.push(ScriptedStep::launch_failure()).await;
        let sinks = RecordingSinks::new();
        let err = runner
            .run(&ProcessInvocation::new("missing", vec![]), sinks.as_ref())
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::LaunchFailed { .. }));
    }
}
