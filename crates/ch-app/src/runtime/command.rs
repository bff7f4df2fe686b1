use ch_core::{ClipboardEntry, EntryId, HistoryError, PollOutcome, SystemClipboardSnapshot};
use tokio::sync::oneshot;

use super::error::EngineError;

pub(crate) type Reply<T> = oneshot::Sender<T>;

/// Requests processed by the engine task, each with a reply channel.
pub(crate) enum HistoryCommand {
    Ordered {
        reply: Reply<Vec<ClipboardEntry>>,
    },
    RecordObservation {
        snapshot: SystemClipboardSnapshot,
        reply: Reply<PollOutcome>,
    },
    TogglePin {
        id: EntryId,
        reply: Reply<bool>,
    },
    Delete {
        id: EntryId,
        reply: Reply<bool>,
    },
    UpdateContent {
        id: EntryId,
        text: String,
        reply: Reply<bool>,
    },
    Clear {
        reply: Reply<()>,
    },
    CopyToSystemClipboard {
        id: EntryId,
        reply: Reply<Result<bool, HistoryError>>,
    },
    SetMaxUnpinned {
        max_unpinned: usize,
        reply: Reply<()>,
    },
    SuppressNextObservation {
        reply: Reply<()>,
    },
    StartPolling {
        reply: Reply<()>,
    },
    StopPolling {
        reply: Reply<()>,
    },
    PollNow {
        reply: Reply<Result<PollOutcome, EngineError>>,
    },
    Shutdown {
        reply: Reply<()>,
    },
}
