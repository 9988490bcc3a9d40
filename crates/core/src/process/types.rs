//! Types for the process runner.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// External tools the pipeline drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// General-purpose media extractor (SoundCloud path).
    YtDlp,
    /// Catalog-matching downloader (Spotify / Apple Music path).
    SpotDl,
    /// Audio converter.
    Ffmpeg,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Self::Ffmpeg, Self::YtDlp, Self::SpotDl];

    /// Executable name looked up on PATH.
    pub fn binary_name(&self) -> &'static str {
        match self {
            Self::YtDlp => "yt-dlp",
            Self::SpotDl => "spotdl",
            Self::Ffmpeg => "ffmpeg",
        }
    }

    /// Python module that runs the tool with `python -m`, if any.
    pub fn python_module(&self) -> Option<&'static str> {
        match self {
            Self::YtDlp => Some("yt_dlp"),
            Self::SpotDl => Some("spotdl"),
            Self::Ffmpeg => None,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary_name())
    }
}

/// Where a tool was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolLocation {
    /// Path set explicitly in config.
    Configured(PathBuf),
    /// Binary shipped next to the application.
    Bundled(PathBuf),
    /// Found on the system PATH.
    OnPath(PathBuf),
    /// Run through an interpreter as a module.
    Module { interpreter: PathBuf, module: String },
    /// Not found anywhere; launching will fail.
    Missing,
}

impl ToolLocation {
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Missing)
    }

    /// Direct executable path, if the tool runs as a binary.
    pub fn executable(&self) -> Option<&Path> {
        match self {
            Self::Configured(p) | Self::Bundled(p) | Self::OnPath(p) => Some(p),
            Self::Module { .. } | Self::Missing => None,
        }
    }
}

impl fmt::Display for ToolLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured(p) => write!(f, "configured at {}", p.display()),
            Self::Bundled(p) => write!(f, "bundled at {}", p.display()),
            Self::OnPath(p) => write!(f, "found in PATH at {}", p.display()),
            Self::Module {
                interpreter,
                module,
            } => write!(f, "runs as module: {} -m {}", interpreter.display(), module),
            Self::Missing => f.write_str("not found"),
        }
    }
}

/// A fully resolved command, ready to spawn.
///
/// Transient: built right before one external call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInvocation {
    /// Program to execute.
    pub program: PathBuf,
    /// Arguments, passed unchanged.
    pub args: Vec<String>,
    /// Working directory for the child, inherited when `None`.
    pub working_dir: Option<PathBuf>,
}

impl ProcessInvocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
        }
    }

    /// Sets the child's working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// The command line as a single string, for logs and error messages.
    pub fn command_line(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.to_string_lossy().into_owned());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Whether any argument equals `arg`.
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// The argument following `flag`, if present.
    pub fn arg_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}
