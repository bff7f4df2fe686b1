//! System clipboard port.

use anyhow::Result;

use crate::clipboard::{ClipboardRepresentation, SystemClipboardSnapshot};

/// Abstracts the OS clipboard.
///
/// Implementations read every advertised format in one pass. A format that
/// is advertised but fails to read is reported as
/// [`RepresentationPayload::Unreadable`](crate::clipboard::RepresentationPayload)
/// rather than failing the whole snapshot.
pub trait SystemClipboardPort: Send + Sync {
    fn read_snapshot(&self) -> Result<SystemClipboardSnapshot>;

    /// Replaces the clipboard contents with all given representations at once.
    fn write_representations(&self, representations: &[ClipboardRepresentation]) -> Result<()>;
}
