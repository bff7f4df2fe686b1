//! One clipboard observation cycle.
//!
//! The poller compares each snapshot with the last content it saw and hands
//! new content to the store. Scheduling lives in the app runtime; this type
//! only decides what a single snapshot means.

use tracing::{debug, trace};

use crate::capture::FormatCapture;
use crate::clipboard::SystemClipboardSnapshot;
use crate::history::{ContentIdentity, HistoryStore};
use crate::ids::EntryId;
use crate::suppressor::ChangeSuppressor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The change was our own write.
    Suppressed,
    /// Nothing capturable on the clipboard.
    Empty,
    /// Same content as the previous cycle.
    Unchanged,
    Captured(EntryId),
}

pub struct ClipboardPoller {
    capture: FormatCapture,
    suppressor: ChangeSuppressor,
    baseline: Option<ContentIdentity<'static>>,
}

impl ClipboardPoller {
    pub fn new(capture: FormatCapture, suppressor: ChangeSuppressor) -> Self {
        Self {
            capture,
            suppressor,
            baseline: None,
        }
    }

    /// Seeds the baseline from an existing snapshot without recording it,
    /// so content already on the clipboard at startup is not re-added.
    pub fn prime(&mut self, snapshot: &SystemClipboardSnapshot) {
        if let Some(payload) = self.capture.capture(snapshot) {
            self.baseline = Some(payload.identity().into_owned());
        }
    }

    pub fn observe(
        &mut self,
        snapshot: &SystemClipboardSnapshot,
        store: &mut HistoryStore,
    ) -> PollOutcome {
        if self.suppressor.consume() {
            // The clipboard now holds what we wrote; treat it as seen.
            self.prime(snapshot);
            debug!("clipboard change suppressed");
            return PollOutcome::Suppressed;
        }

        let Some(payload) = self.capture.capture(snapshot) else {
            trace!("clipboard holds nothing capturable");
            return PollOutcome::Empty;
        };

        let identity = payload.identity().into_owned();
        if self.baseline.as_ref() == Some(&identity) {
            trace!("clipboard unchanged");
            return PollOutcome::Unchanged;
        }

        let id = store.add_entry(payload);
        self.baseline = Some(identity);
        PollOutcome::Captured(id)
    }
}
