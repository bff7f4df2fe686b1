use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::FormatId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MimeType(pub String);

impl MimeType {
    pub fn text_plain() -> Self {
        Self("text/plain".into())
    }
    pub fn text_rtf() -> Self {
        Self("text/rtf".into())
    }
    pub fn text_html() -> Self {
        Self("text/html".into())
    }
    pub fn image_png() -> Self {
        Self("image/png".into())
    }
    pub fn image_tiff() -> Self {
        Self("image/tiff".into())
    }
    pub fn uri_list() -> Self {
        Self("text/uri-list".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Media type without parameters, lowercased (`Text/Plain; charset=utf-8` -> `text/plain`).
    pub fn essence(&self) -> String {
        self.0
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    pub fn is_plain_text(&self) -> bool {
        self.essence() == "text/plain"
    }

    pub fn is_rich_text(&self) -> bool {
        matches!(self.essence().as_str(), "text/rtf" | "application/rtf")
    }

    pub fn is_image(&self) -> bool {
        self.essence().starts_with("image/")
    }

    /// Maps well-known platform format identifiers to a MIME type.
    ///
    /// Covers clipboard-rs names, macOS UTIs, X11 targets and Windows
    /// clipboard format names. Identifiers that already look like a MIME type
    /// are taken as-is.
    pub fn infer_from_format(format_id: &FormatId) -> Option<Self> {
        let raw = format_id.as_str();
        let lower = raw.to_ascii_lowercase();
        let mime = match lower.as_str() {
            "text" | "public.utf8-plain-text" | "public.plain-text" | "nsstringpboardtype"
            | "utf8_string" | "string" | "cf_text" | "cf_unicodetext" => {
                Self::text_plain()
            }
            "rtf" | "public.rtf" | "nsrtfpboardtype" | "rich text format" => Self::text_rtf(),
            "html" | "public.html" | "html format" => Self::text_html(),
            "image" | "public.png" | "png" => Self::image_png(),
            "public.tiff" | "nstiffpboardtype" | "cf_tiff" => Self::image_tiff(),
            "public.jpeg" => Self("image/jpeg".into()),
            "files" | "public.file-url" => Self::uri_list(),
            _ if lower.contains('/') && !lower.starts_with('/') => Self(raw.to_string()),
            _ => return None,
        };
        Some(mime)
    }

    /// Guesses an image MIME type from magic bytes, defaulting to PNG.
    pub fn sniff_image(bytes: &[u8]) -> Self {
        const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
        if bytes.starts_with(PNG_MAGIC) {
            Self::image_png()
        } else if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
            Self::image_tiff()
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self("image/jpeg".into())
        } else {
            Self::image_png()
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
