use crate::ids::EntryId;

/// Why the history changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    Added,
    Merged,
    PinToggled,
    Deleted,
    Updated,
    Cleared,
    CapacityChanged,
    Restored,
}

/// Broadcast after every applied mutation. Subscribers re-query
/// [`HistoryStore::ordered`](super::HistoryStore::ordered) for the new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryChanged {
    pub reason: ChangeReason,
    pub entry_id: Option<EntryId>,
}

impl HistoryChanged {
    pub fn new(reason: ChangeReason, entry_id: Option<EntryId>) -> Self {
        Self { reason, entry_id }
    }
}
