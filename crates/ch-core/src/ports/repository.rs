use anyhow::Result;

use crate::history::ClipboardEntry;

/// Durable storage for the history.
pub trait HistoryRepositoryPort: Send + Sync {
    /// Returns the persisted entries sorted by descending timestamp.
    ///
    /// A missing store yields an empty list; an unreadable or malformed one
    /// is an error.
    fn load(&self) -> Result<Vec<ClipboardEntry>>;

    fn save(&self, entries: &[ClipboardEntry]) -> Result<()>;
}
