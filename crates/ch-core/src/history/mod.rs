//! Clipboard history: entries, dedup identity and the in-memory store.

mod entry;
mod error;
mod event;
mod store;

pub use entry::{ClipboardEntry, ContentIdentity, EntryKind, FormatBlob};
pub use error::HistoryError;
pub use event::{ChangeReason, HistoryChanged};
pub use store::{HistoryStore, HistoryStoreDeps};
