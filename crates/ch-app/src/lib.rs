//! cliphaven application orchestration layer.
//!
//! Runs the history engine: one task owning the store and the poller, driven
//! by a poll ticker and by commands from [`HistoryHandle`]s.

pub mod app_paths;
pub mod runtime;

pub use app_paths::AppPaths;
pub use runtime::{EngineConfig, EngineError, HistoryEngine, HistoryHandle};
