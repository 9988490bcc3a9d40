//! Batch orchestrator: drains the work queue on a background task.
//!
//! Items are processed strictly one at a time, since the catalog adapters
//! change the process working directory for their duration. A failing item
//! never stops the batch; cancellation is checked between items.

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::{BatchHandle, BatchOrchestrator};
pub use types::{BatchSummary, OrchestratorError, OrchestratorState};
