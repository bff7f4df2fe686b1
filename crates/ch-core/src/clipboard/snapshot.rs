use crate::clipboard::MimeType;
use crate::ids::FormatId;

/// Availability of one representation's bytes at observation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepresentationPayload {
    /// Bytes were read successfully.
    Ready(Vec<u8>),
    /// The platform advertised the format but reading it failed.
    Unreadable { reason: String },
}

/// Coarse classification of a representation, used by capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationKind {
    RichText,
    Image,
    PlainText,
    Other,
}

/// One format observed on the system clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedRepresentation {
    pub format_id: FormatId,
    pub mime: Option<MimeType>,
    pub payload: RepresentationPayload,
}

impl ObservedRepresentation {
    pub fn ready(format_id: impl Into<FormatId>, mime: Option<MimeType>, bytes: Vec<u8>) -> Self {
        Self {
            format_id: format_id.into(),
            mime,
            payload: RepresentationPayload::Ready(bytes),
        }
    }

    pub fn unreadable(
        format_id: impl Into<FormatId>,
        mime: Option<MimeType>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            format_id: format_id.into(),
            mime,
            payload: RepresentationPayload::Unreadable {
                reason: reason.into(),
            },
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.payload {
            RepresentationPayload::Ready(bytes) => Some(bytes),
            RepresentationPayload::Unreadable { .. } => None,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes().map_or(0, <[u8]>::len)
    }

    /// The attached MIME type, or one inferred from the format identifier.
    pub fn effective_mime(&self) -> Option<MimeType> {
        self.mime
            .clone()
            .or_else(|| MimeType::infer_from_format(&self.format_id))
    }

    pub fn kind(&self) -> RepresentationKind {
        match self.effective_mime() {
            Some(mime) if mime.is_rich_text() => RepresentationKind::RichText,
            Some(mime) if mime.is_image() => RepresentationKind::Image,
            Some(mime) if mime.is_plain_text() => RepresentationKind::PlainText,
            _ => RepresentationKind::Other,
        }
    }
}

/// Raw state of the system clipboard at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemClipboardSnapshot {
    pub ts_ms: i64,
    pub representations: Vec<ObservedRepresentation>,
}

impl SystemClipboardSnapshot {
    pub fn new(ts_ms: i64, representations: Vec<ObservedRepresentation>) -> Self {
        Self {
            ts_ms,
            representations,
        }
    }

    pub fn empty(ts_ms: i64) -> Self {
        Self::new(ts_ms, Vec::new())
    }

    pub fn representation_count(&self) -> usize {
        self.representations.len()
    }

    pub fn total_size_bytes(&self) -> usize {
        self.representations.iter().map(|r| r.size_bytes()).sum()
    }

    /// Number of distinct format identifiers the clipboard advertised,
    /// readable or not.
    pub fn advertised_format_count(&self) -> usize {
        let mut ids: Vec<&FormatId> = self.representations.iter().map(|r| &r.format_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Readable representations of the given kind, in snapshot order.
    pub fn ready_of_kind(
        &self,
        kind: RepresentationKind,
    ) -> impl Iterator<Item = &ObservedRepresentation> + '_ {
        self.representations
            .iter()
            .filter(move |r| r.bytes().is_some() && r.kind() == kind)
    }
}
