//! # ch-core
//!
//! Core domain models and business logic for cliphaven.
//!
//! This crate contains the clipboard history engine without any
//! infrastructure dependencies: the platform clipboard, the history file and
//! image decoding are all reached through [`ports`].

pub mod app_dirs;
pub mod capture;
pub mod clipboard;
pub mod config;
pub mod history;
pub mod ids;
pub mod poller;
pub mod ports;
pub mod suppressor;

// Re-export commonly used types at the crate root
pub use capture::{CapturedPayload, FormatCapture};
pub use clipboard::{
    ClipboardRepresentation, MimeType, ObservedRepresentation, RepresentationKind,
    RepresentationPayload, SystemClipboardSnapshot,
};
pub use config::AppConfig;
pub use history::{
    ChangeReason, ClipboardEntry, ContentIdentity, EntryKind, FormatBlob, HistoryChanged,
    HistoryError, HistoryStore, HistoryStoreDeps,
};
pub use ids::{EntryId, FormatId};
pub use poller::{ClipboardPoller, PollOutcome};
pub use suppressor::ChangeSuppressor;
