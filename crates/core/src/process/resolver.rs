//! Tool resolution: explicit path, bundled binary, PATH, module fallback.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::ToolsConfig;

use super::types::{ProcessInvocation, Tool, ToolLocation};

/// Resolves [`Tool`]s to runnable commands.
#[derive(Debug, Clone)]
pub struct ToolResolver {
    config: ToolsConfig,
    /// PATH override; the process environment is used when `None`.
    search_path: Option<OsString>,
}

impl ToolResolver {
    /// Relative tool locations are anchored to the current directory at
    /// construction, so later `chdir`s (catalog adapters) do not move them.
    /// Bare configured names such as `ffmpeg` stay as they are and are
    /// looked up on PATH.
    pub fn new(mut config: ToolsConfig) -> Self {
        config.bundled_dir = anchor(config.bundled_dir);
        for path in [
            &mut config.ffmpeg_path,
            &mut config.yt_dlp_path,
            &mut config.spotdl_path,
        ] {
            if let Some(configured) = path.take() {
                *path = Some(if configured.components().count() > 1 {
                    anchor(configured)
                } else {
                    configured
                });
            }
        }

        Self {
            config,
            search_path: None,
        }
    }

    /// Searches `path` instead of the process `PATH`.
    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    pub fn config(&self) -> &ToolsConfig {
        &self.config
    }

    fn configured_path(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::Ffmpeg => self.config.ffmpeg_path.as_deref(),
            Tool::YtDlp => self.config.yt_dlp_path.as_deref(),
            Tool::SpotDl => self.config.spotdl_path.as_deref(),
        }
    }

    /// Candidate locations for a bundled binary, in priority order.
    fn bundled_candidates(&self, tool: Tool) -> [PathBuf; 2] {
        let file_name = format!("{}{}", tool.binary_name(), std::env::consts::EXE_SUFFIX);
        [
            self.config.bundled_dir.join(&file_name),
            self.config
                .bundled_dir
                .join(tool.binary_name())
                .join("bin")
                .join(&file_name),
        ]
    }

    fn which(&self, name: impl AsRef<std::ffi::OsStr>) -> Option<PathBuf> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let paths = self
            .search_path
            .clone()
            .or_else(|| std::env::var_os("PATH"));
        which::which_in(name, paths, cwd).ok()
    }

    /// Finds where `tool` would be run from.
    pub fn locate(&self, tool: Tool) -> ToolLocation {
        if let Some(path) = self.configured_path(tool) {
            if path.exists() {
                return ToolLocation::Configured(path.to_path_buf());
            }
            if let Some(found) = self.which(path) {
                return ToolLocation::Configured(found);
            }
            warn!(
                "Configured path {} for {} not found, trying auto-detection",
                path.display(),
                tool
            );
        }

        if let Some(bundled) = self
            .bundled_candidates(tool)
            .into_iter()
            .find(|candidate| candidate.is_file())
        {
            debug!("Using bundled {} at {}", tool, bundled.display());
            return ToolLocation::Bundled(bundled);
        }

        if let Some(found) = self.which(tool.binary_name()) {
            debug!("{} found in PATH at {}", tool, found.display());
            return ToolLocation::OnPath(found);
        }

        match tool.python_module() {
            Some(module) => {
                debug!("{} not in PATH, will run as Python module {}", tool, module);
                ToolLocation::Module {
                    interpreter: self.config.python.clone(),
                    module: module.to_string(),
                }
            }
            None => ToolLocation::Missing,
        }
    }

    /// Path to pass to other tools that take an executable location
    /// (`--ffmpeg-location`, `--ffmpeg`). Falls back to the bare name.
    pub fn program_path(&self, tool: Tool) -> PathBuf {
        self.locate(tool)
            .executable()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(tool.binary_name()))
    }

    /// Builds an invocation of `tool` with `args`.
    ///
    /// With the module fallback the arguments are forwarded unchanged after
    /// `-m <module>`. A missing tool yields its bare name so that spawning
    /// reports a launch failure.
    pub fn invocation(&self, tool: Tool, args: Vec<String>) -> ProcessInvocation {
        match self.locate(tool) {
            ToolLocation::Configured(path) | ToolLocation::Bundled(path) | ToolLocation::OnPath(path) => {
                ProcessInvocation::new(path, args)
            }
            ToolLocation::Module {
                interpreter,
                module,
            } => {
                let mut full = Vec::with_capacity(args.len() + 2);
                full.push("-m".to_string());
                full.push(module);
                full.extend(args);
                ProcessInvocation::new(interpreter, full)
            }
            ToolLocation::Missing => ProcessInvocation::new(tool.binary_name(), args),
        }
    }
}

/// Makes `path` absolute against the current directory.
fn anchor(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::path::absolute(&path) {
        Ok(absolute) => absolute,
        Err(e) => {
            warn!("Cannot resolve {} against the working directory: {}", path.display(), e);
            path
        }
    }
}
