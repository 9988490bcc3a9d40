pub mod artwork;
pub mod config;
pub mod converter;
pub mod metadata;
pub mod metrics;
pub mod orchestrator;
pub mod platform;
pub mod process;
pub mod queue;
pub mod sink;
pub mod testing;

pub use artwork::{ArtworkFetcher, HttpArtworkFetcher};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, ArtworkConfig,
    Config, ConfigError, DownloadsConfig, ToolsConfig,
};
pub use converter::{Converter, ConverterError, FfmpegConverter};
pub use metadata::{TagEmbedder, TagError, TrackMetadata};
pub use orchestrator::{
    BatchHandle, BatchOrchestrator, BatchSummary, OrchestratorConfig, OrchestratorError,
    OrchestratorState,
};
pub use platform::{
    AcquisitionError, AcquisitionOutput, AcquisitionRequest, AcquisitionResult, AdapterRegistry,
    AudioFormat, Platform, PlatformAdapter,
};
pub use process::{ProcessError, ProcessRunner, SystemProcessRunner, Tool, ToolLocation, ToolResolver};
pub use queue::WorkQueue;
pub use sink::{ErrorSink, LogSink, Sinks, StatusSink, TracingSinks};
