use chrono::{DateTime, Utc};
use std::borrow::Cow;

use crate::ids::{EntryId, FormatId};

/// One raw clipboard format captured alongside the primary payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatBlob {
    pub format_id: FormatId,
    pub bytes: Vec<u8>,
}

impl FormatBlob {
    pub fn new(format_id: impl Into<FormatId>, bytes: Vec<u8>) -> Self {
        Self {
            format_id: format_id.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    PlainText,
    RichText,
    Image,
}

/// Equality key used to deduplicate history.
///
/// Rich text and images compare by exact payload bytes; plain text by
/// exact string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentIdentity<'a> {
    Text(Cow<'a, str>),
    Image(Cow<'a, [u8]>),
    RichText(Cow<'a, [u8]>),
}

impl ContentIdentity<'_> {
    pub fn into_owned(self) -> ContentIdentity<'static> {
        match self {
            Self::Text(text) => ContentIdentity::Text(Cow::Owned(text.into_owned())),
            Self::Image(bytes) => ContentIdentity::Image(Cow::Owned(bytes.into_owned())),
            Self::RichText(bytes) => ContentIdentity::RichText(Cow::Owned(bytes.into_owned())),
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Text(_) => EntryKind::PlainText,
            Self::Image(_) => EntryKind::Image,
            Self::RichText(_) => EntryKind::RichText,
        }
    }
}

impl<'a> ContentIdentity<'a> {
    /// Picks the identity by payload precedence: rich text, then image, then text.
    pub(crate) fn classify(
        primary_text: &'a str,
        image_bytes: Option<&'a [u8]>,
        rich_text_bytes: Option<&'a [u8]>,
    ) -> Self {
        match (rich_text_bytes, image_bytes) {
            (Some(rich), _) => Self::RichText(Cow::Borrowed(rich)),
            (None, Some(image)) => Self::Image(Cow::Borrowed(image)),
            (None, None) => Self::Text(Cow::Borrowed(primary_text)),
        }
    }
}

/// A single history item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEntry {
    pub id: EntryId,
    /// Text shown for the entry. For images and text-less rich text this is
    /// a synthesized description.
    pub primary_text: String,
    /// When the content was (last) copied. Edits leave it untouched.
    pub timestamp: DateTime<Utc>,
    pub pinned: bool,
    pub image_bytes: Option<Vec<u8>>,
    /// RTF document bytes.
    pub rich_text_bytes: Option<Vec<u8>>,
    pub format_bundle: Option<Vec<FormatBlob>>,
}

impl ClipboardEntry {
    pub fn kind(&self) -> EntryKind {
        self.identity().kind()
    }

    pub fn identity(&self) -> ContentIdentity<'_> {
        ContentIdentity::classify(
            &self.primary_text,
            self.image_bytes.as_deref(),
            self.rich_text_bytes.as_deref(),
        )
    }

    pub fn is_plain_text(&self) -> bool {
        self.kind() == EntryKind::PlainText
    }
}
