mod command;
mod engine;
mod error;
mod handle;

pub use engine::{EngineConfig, HistoryEngine};
pub use error::EngineError;
pub use handle::HistoryHandle;
