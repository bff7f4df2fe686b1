use crate::clipboard::MimeType;
use crate::ids::FormatId;

/// One representation to be written to the system clipboard.
///
/// A write carries one or more of these; platform adapters place all of them
/// on the clipboard in a single operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardRepresentation {
    pub format_id: FormatId,
    pub mime: Option<MimeType>,
    pub bytes: Vec<u8>,
}

impl ClipboardRepresentation {
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self {
            format_id: FormatId::from("text"),
            mime: Some(MimeType::text_plain()),
            bytes: text.into().into_bytes(),
        }
    }

    pub fn rich_text(bytes: Vec<u8>) -> Self {
        Self {
            format_id: FormatId::from("rtf"),
            mime: Some(MimeType::text_rtf()),
            bytes,
        }
    }

    pub fn image(bytes: Vec<u8>) -> Self {
        let mime = MimeType::sniff_image(&bytes);
        Self {
            format_id: FormatId::from("image"),
            mime: Some(mime),
            bytes,
        }
    }

    /// A raw format restored from a captured bundle.
    pub fn raw(format_id: FormatId, bytes: Vec<u8>) -> Self {
        let mime = MimeType::infer_from_format(&format_id);
        Self {
            format_id,
            mime,
            bytes,
        }
    }
}
