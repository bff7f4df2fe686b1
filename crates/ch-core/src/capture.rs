//! Classifies a clipboard snapshot into a history payload.

use std::sync::Arc;

use tracing::debug;

use crate::clipboard::{
    MimeType, ObservedRepresentation, RepresentationKind, RepresentationPayload,
    SystemClipboardSnapshot,
};
use crate::history::{ContentIdentity, EntryKind, FormatBlob};
use crate::ports::ImageProbePort;

pub const RICH_TEXT_PLACEHOLDER: &str = "[Rich Text]";
pub const IMAGE_PLACEHOLDER: &str = "[Image]";

/// Content extracted from one snapshot, ready to become a history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPayload {
    pub primary_text: String,
    pub image_bytes: Option<Vec<u8>>,
    pub rich_text_bytes: Option<Vec<u8>>,
    pub format_bundle: Option<Vec<FormatBlob>>,
}

impl CapturedPayload {
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self {
            primary_text: text.into(),
            image_bytes: None,
            rich_text_bytes: None,
            format_bundle: None,
        }
    }

    pub fn identity(&self) -> ContentIdentity<'_> {
        ContentIdentity::classify(
            &self.primary_text,
            self.image_bytes.as_deref(),
            self.rich_text_bytes.as_deref(),
        )
    }

    pub fn kind(&self) -> EntryKind {
        self.identity().kind()
    }

    /// Bytes change detection compares: rich text, else image, else text.
    pub fn relevant_payload(&self) -> &[u8] {
        self.rich_text_bytes
            .as_deref()
            .or(self.image_bytes.as_deref())
            .unwrap_or(self.primary_text.as_bytes())
    }
}

pub struct FormatCapture {
    image_probe: Arc<dyn ImageProbePort>,
}

impl FormatCapture {
    pub fn new(image_probe: Arc<dyn ImageProbePort>) -> Self {
        Self { image_probe }
    }

    /// Returns `None` when the snapshot holds nothing worth recording.
    pub fn capture(&self, snapshot: &SystemClipboardSnapshot) -> Option<CapturedPayload> {
        let plain = first_plain_text(snapshot);

        let mut payload = if let Some(rich) = first_ready(snapshot, RepresentationKind::RichText) {
            CapturedPayload {
                primary_text: plain.unwrap_or_else(|| RICH_TEXT_PLACEHOLDER.to_string()),
                image_bytes: None,
                rich_text_bytes: Some(rich.to_vec()),
                format_bundle: None,
            }
        } else if let Some(image) = preferred_image(snapshot) {
            CapturedPayload {
                primary_text: self.describe_image(image),
                image_bytes: Some(image.to_vec()),
                rich_text_bytes: None,
                format_bundle: None,
            }
        } else {
            CapturedPayload::plain_text(plain?)
        };

        if snapshot.advertised_format_count() > 1 {
            payload.format_bundle = build_bundle(snapshot);
        }

        debug!(
            kind = ?payload.kind(),
            formats = snapshot.representation_count(),
            bundled = payload.format_bundle.as_ref().map_or(0, Vec::len),
            "clipboard snapshot captured"
        );
        Some(payload)
    }

    fn describe_image(&self, bytes: &[u8]) -> String {
        match self.image_probe.dimensions(bytes) {
            Some((width, height)) => format!("{IMAGE_PLACEHOLDER} {width}x{height}"),
            None => IMAGE_PLACEHOLDER.to_string(),
        }
    }
}

fn first_ready(snapshot: &SystemClipboardSnapshot, kind: RepresentationKind) -> Option<&[u8]> {
    snapshot.ready_of_kind(kind).find_map(ObservedRepresentation::bytes)
}

fn first_plain_text(snapshot: &SystemClipboardSnapshot) -> Option<String> {
    snapshot
        .ready_of_kind(RepresentationKind::PlainText)
        .filter_map(ObservedRepresentation::bytes)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .find(|text| !text.is_empty())
}

/// PNG first, then TIFF, then any other image format.
fn preferred_image(snapshot: &SystemClipboardSnapshot) -> Option<&[u8]> {
    let images: Vec<&ObservedRepresentation> =
        snapshot.ready_of_kind(RepresentationKind::Image).collect();
    let with_mime = |wanted: MimeType| {
        images
            .iter()
            .find(|rep| rep.effective_mime().is_some_and(|m| m.essence() == wanted.as_str()))
            .copied()
    };

    with_mime(MimeType::image_png())
        .or_else(|| with_mime(MimeType::image_tiff()))
        .or_else(|| images.first().copied())
        .and_then(ObservedRepresentation::bytes)
}

fn build_bundle(snapshot: &SystemClipboardSnapshot) -> Option<Vec<FormatBlob>> {
    let mut bundle = Vec::with_capacity(snapshot.representation_count());
    for rep in &snapshot.representations {
        match &rep.payload {
            RepresentationPayload::Ready(bytes) => {
                bundle.push(FormatBlob::new(rep.format_id.clone(), bytes.clone()));
            }
            RepresentationPayload::Unreadable { reason } => {
                debug!(format_id = %rep.format_id, %reason, "skipping unreadable format");
            }
        }
    }
    (!bundle.is_empty()).then_some(bundle)
}
