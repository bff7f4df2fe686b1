//! # ch-platform
//!
//! OS-facing adapters for cliphaven: the system clipboard and the
//! per-user application directories.

pub mod app_dirs;
pub mod clipboard;

pub use app_dirs::DirsAppDirsAdapter;
pub use clipboard::ClipboardRsClipboard;
