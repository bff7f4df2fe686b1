use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to write to system clipboard: {0}")]
    ClipboardWrite(String),
}
