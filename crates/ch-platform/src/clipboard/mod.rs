mod common;
mod system;

pub use system::ClipboardRsClipboard;
