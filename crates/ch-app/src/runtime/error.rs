use ch_core::HistoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine task has shut down.
    #[error("history engine is closed")]
    Closed,

    #[error("failed to read system clipboard: {0}")]
    ClipboardRead(String),

    #[error(transparent)]
    History(#[from] HistoryError),
}
