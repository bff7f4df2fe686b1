//! Clipboard domain models.
//!
//! - [`SystemClipboardSnapshot`] is what was observed on the system clipboard:
//!   every advertised format with its bytes, or the reason it could not be read.
//! - [`ClipboardRepresentation`] is what gets written back.

mod mime;
mod representation;
mod snapshot;

pub use mime::MimeType;
pub use representation::ClipboardRepresentation;
pub use snapshot::{
    ObservedRepresentation, RepresentationKind, RepresentationPayload, SystemClipboardSnapshot,
};
