//! Process runner for external tools.
//!
//! This module resolves tool names (yt-dlp, spotdl, ffmpeg) to something
//! runnable and runs them as child processes, streaming their output
//! line-by-line to a [`LogSink`](crate::sink::LogSink).
//!
//! # Resolution
//!
//! 1. Explicit path from `[tools]` config
//! 2. Bundled binary under `tools.bundled_dir`
//! 3. System `PATH`
//! 4. `<python> -m <module>` for tools that ship as Python modules
//!
//! # Example
//!
//! ```ignore
//! use trackgrab_core::process::{ProcessRunner, SystemProcessRunner, Tool, ToolResolver};
//!
//! let resolver = ToolResolver::new(config.tools.clone());
//! let invocation = resolver.invocation(Tool::YtDlp, vec!["--version".to_string()]);
//! SystemProcessRunner.run(&invocation, &sink).await?;
//! ```

mod error;
mod resolver;
mod runner;
mod types;

pub use error::ProcessError;
pub use resolver::ToolResolver;
pub use runner::{ProcessRunner, SystemProcessRunner};
pub use types::{ProcessInvocation, Tool, ToolLocation};
