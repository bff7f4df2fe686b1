use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::capture::{CapturedPayload, RICH_TEXT_PLACEHOLDER};
use crate::clipboard::ClipboardRepresentation;
use crate::history::{
    ChangeReason, ClipboardEntry, ContentIdentity, EntryKind, HistoryChanged, HistoryError,
};
use crate::ids::EntryId;
use crate::ports::{ClockPort, HistoryRepositoryPort, SystemClipboardPort};
use crate::suppressor::ChangeSuppressor;

const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct HistoryStoreDeps {
    pub repository: Arc<dyn HistoryRepositoryPort>,
    pub clipboard: Arc<dyn SystemClipboardPort>,
    pub suppressor: ChangeSuppressor,
    pub clock: Arc<dyn ClockPort>,
}

/// The authoritative clipboard history.
///
/// Entries are keyed by id; display order is derived on every query. Each
/// applied mutation is persisted and announced on the change channel. Missing
/// ids are no-ops.
pub struct HistoryStore {
    entries: HashMap<EntryId, ClipboardEntry>,
    max_unpinned: usize,
    deps: HistoryStoreDeps,
    events: broadcast::Sender<HistoryChanged>,
}

impl HistoryStore {
    pub fn new(deps: HistoryStoreDeps, max_unpinned: usize) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            entries: HashMap::new(),
            max_unpinned,
            deps,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HistoryChanged> {
        self.events.subscribe()
    }

    /// Sender side of the change channel, for handles that subscribe
    /// without going through the store.
    pub fn event_sender(&self) -> broadcast::Sender<HistoryChanged> {
        self.events.clone()
    }

    pub fn suppressor(&self) -> &ChangeSuppressor {
        &self.deps.suppressor
    }

    pub fn max_unpinned(&self) -> usize {
        self.max_unpinned
    }

    /// Replaces the in-memory history with the persisted one, then writes
    /// the file back if duplicates or over-capacity entries were dropped.
    ///
    /// A failed load is logged and leaves the history empty. Returns the
    /// number of entries kept.
    pub fn restore(&mut self) -> usize {
        let (dropped, evicted) = self.load_history_inner();
        if dropped > 0 || evicted > 0 {
            self.persist();
        }

        info!(
            entries = self.entries.len(),
            dropped_duplicates = dropped,
            evicted,
            "history restored"
        );
        self.emit(ChangeReason::Restored, None);
        self.entries.len()
    }

    /// Like [`restore`](Self::restore) but never writes the file and emits
    /// nothing. Duplicates and the capacity policy apply in memory only.
    pub fn load_history(&mut self) -> usize {
        self.load_history_inner();
        self.entries.len()
    }

    fn load_history_inner(&mut self) -> (usize, usize) {
        let loaded = match self.deps.repository.load() {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "failed to load history, starting empty");
                Vec::new()
            }
        };

        self.entries.clear();
        let mut kept_by_identity: HashMap<ContentIdentity<'static>, EntryId> = HashMap::new();
        let mut dropped = 0usize;
        // Loaded newest first; the newest occurrence of an identity wins and
        // inherits the pin of any older copy.
        for entry in loaded {
            if self.entries.contains_key(&entry.id) {
                dropped += 1;
                continue;
            }
            let identity = entry.identity().into_owned();
            if let Some(kept_id) = kept_by_identity.get(&identity) {
                if entry.pinned {
                    if let Some(kept) = self.entries.get_mut(kept_id) {
                        kept.pinned = true;
                    }
                }
                debug!(entry_id = %entry.id, kept = %kept_id, "restore: dropped duplicate entry");
                dropped += 1;
                continue;
            }
            kept_by_identity.insert(identity, entry.id.clone());
            self.entries.insert(entry.id.clone(), entry);
        }

        let evicted = self.evict_over(self.max_unpinned);
        (dropped, evicted)
    }

    /// Records captured content, merging it into an existing entry with the
    /// same content identity.
    ///
    /// A merged entry keeps its id and pin, takes the new payload and moves
    /// to the front with a fresh timestamp.
    pub fn add_entry(&mut self, payload: CapturedPayload) -> EntryId {
        let timestamp = self.next_timestamp();
        let existing = self
            .entries
            .values()
            .find(|entry| entry.identity() == payload.identity())
            .map(|entry| (entry.id.clone(), entry.pinned));

        let (id, pinned, reason) = match existing {
            Some((id, pinned)) => {
                self.entries.remove(&id);
                (id, pinned, ChangeReason::Merged)
            }
            None => (EntryId::new(), false, ChangeReason::Added),
        };

        let kind = payload.kind();
        let entry = ClipboardEntry {
            id: id.clone(),
            primary_text: payload.primary_text,
            timestamp,
            pinned,
            image_bytes: payload.image_bytes,
            rich_text_bytes: payload.rich_text_bytes,
            format_bundle: payload.format_bundle,
        };
        self.entries.insert(id.clone(), entry);

        let evicted = self.evict_over(self.max_unpinned);
        debug!(entry_id = %id, ?kind, ?reason, evicted, "history entry recorded");

        self.persist();
        self.emit(reason, Some(id.clone()));
        id
    }

    /// Pinned entries first, then unpinned; newest first within each group.
    pub fn ordered(&self) -> Vec<ClipboardEntry> {
        let mut entries: Vec<ClipboardEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then_with(|| b.timestamp.cmp(&a.timestamp))
                .then_with(|| a.id.cmp(&b.id))
        });
        entries
    }

    pub fn get(&self, id: &EntryId) -> Option<&ClipboardEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unpinned_count(&self) -> usize {
        self.entries.values().filter(|entry| !entry.pinned).count()
    }

    pub fn toggle_pin(&mut self, id: &EntryId) -> bool {
        let Some(entry) = self.entries.get_mut(id) else {
            debug!(entry_id = %id, "toggle_pin: entry not found");
            return false;
        };
        entry.pinned = !entry.pinned;
        let pinned = entry.pinned;

        // Unpinning can push the unpinned set over the limit.
        let evicted = self.evict_over(self.max_unpinned);
        debug!(entry_id = %id, pinned, evicted, "history entry pin toggled");

        self.persist();
        self.emit(ChangeReason::PinToggled, Some(id.clone()));
        true
    }

    pub fn delete(&mut self, id: &EntryId) -> bool {
        if self.entries.remove(id).is_none() {
            debug!(entry_id = %id, "delete: entry not found");
            return false;
        }
        debug!(entry_id = %id, "history entry deleted");
        self.persist();
        self.emit(ChangeReason::Deleted, Some(id.clone()));
        true
    }

    /// Replaces the text of a plain-text entry.
    ///
    /// Empty text and non-plain entries are rejected. If the edited entry is
    /// pinned or is the most recent unpinned entry, the new text is also
    /// written to the system clipboard.
    pub fn update_content(&mut self, id: &EntryId, text: &str) -> bool {
        if text.is_empty() {
            debug!(entry_id = %id, "update_content: empty text rejected");
            return false;
        }
        match self.entries.get(id) {
            Some(entry) if entry.is_plain_text() => {}
            Some(_) => {
                debug!(entry_id = %id, "update_content: only plain text entries are editable");
                return false;
            }
            None => {
                debug!(entry_id = %id, "update_content: entry not found");
                return false;
            }
        }

        let duplicate = self
            .entries
            .values()
            .find(|entry| &entry.id != id && entry.is_plain_text() && entry.primary_text == text)
            .map(|entry| entry.id.clone());
        let folded_pin = duplicate
            .and_then(|dup| self.entries.remove(&dup))
            .map(|dup| {
                debug!(entry_id = %id, folded = %dup.id, "update_content: folded duplicate entry");
                dup.pinned
            })
            .unwrap_or(false);

        let Some(entry) = self.entries.get_mut(id) else {
            return false;
        };
        entry.primary_text = text.to_string();
        entry.format_bundle = None;
        entry.pinned |= folded_pin;
        let sync_clipboard = entry.pinned || self.most_recent_unpinned() == Some(id);

        if sync_clipboard {
            let plan = [ClipboardRepresentation::plain_text(text)];
            if let Err(err) = self.write_suppressed(&plan) {
                warn!(entry_id = %id, error = %err, "failed to sync edited entry to clipboard");
            }
        }

        debug!(entry_id = %id, sync_clipboard, "history entry updated");
        self.persist();
        self.emit(ChangeReason::Updated, Some(id.clone()));
        true
    }

    /// Removes every entry, pinned ones included.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        info!(removed, "history cleared");
        self.persist();
        self.emit(ChangeReason::Cleared, None);
    }

    /// Evicts the oldest unpinned entries beyond `max_unpinned`. Pinned
    /// entries are never evicted. Returns the number of evicted entries.
    pub fn apply_capacity_policy(&mut self, max_unpinned: usize) -> usize {
        let evicted = self.evict_over(max_unpinned);
        if evicted > 0 {
            self.persist();
            self.emit(ChangeReason::CapacityChanged, None);
        }
        evicted
    }

    pub fn set_max_unpinned(&mut self, max_unpinned: usize) {
        self.max_unpinned = max_unpinned;
        let evicted = self.evict_over(max_unpinned);
        info!(max_unpinned, evicted, "history capacity changed");
        self.persist();
        self.emit(ChangeReason::CapacityChanged, None);
    }

    /// Writes an entry back to the system clipboard using its richest
    /// representation. Returns `Ok(false)` when the entry does not exist.
    ///
    /// The write is suppressed so it is not re-captured by the next poll.
    pub fn copy_to_system_clipboard(&self, id: &EntryId) -> Result<bool, HistoryError> {
        let Some(entry) = self.entries.get(id) else {
            debug!(entry_id = %id, "copy_to_system_clipboard: entry not found");
            return Ok(false);
        };

        let span = tracing::debug_span!("history.copy_to_clipboard", entry_id = %id);
        let _enter = span.enter();

        let plan = write_plan(entry);
        self.write_suppressed(&plan).map_err(|err| {
            warn!(error = %err, "clipboard write failed");
            err
        })?;
        debug!(representations = plan.len(), "entry copied to system clipboard");
        Ok(true)
    }

    fn write_suppressed(&self, plan: &[ClipboardRepresentation]) -> Result<(), HistoryError> {
        self.deps.suppressor.arm();
        self.deps
            .clipboard
            .write_representations(plan)
            .map_err(|err| {
                self.deps.suppressor.disarm();
                HistoryError::ClipboardWrite(format!("{err:#}"))
            })
    }

    fn most_recent_unpinned(&self) -> Option<&EntryId> {
        self.entries
            .values()
            .filter(|entry| !entry.pinned)
            .max_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| b.id.cmp(&a.id)))
            .map(|entry| &entry.id)
    }

    fn evict_over(&mut self, max_unpinned: usize) -> usize {
        let mut unpinned: Vec<(DateTime<Utc>, EntryId)> = self
            .entries
            .values()
            .filter(|entry| !entry.pinned)
            .map(|entry| (entry.timestamp, entry.id.clone()))
            .collect();
        if unpinned.len() <= max_unpinned {
            return 0;
        }

        unpinned.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        let evicted = unpinned.split_off(max_unpinned);
        for (_, id) in &evicted {
            self.entries.remove(id);
            debug!(entry_id = %id, "history entry evicted");
        }
        evicted.len()
    }

    /// Clock time, bumped past the newest entry so insert order is strict.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now =
            DateTime::<Utc>::from_timestamp_millis(self.deps.clock.now_ms()).unwrap_or_else(Utc::now);
        match self.entries.values().map(|entry| entry.timestamp).max() {
            Some(newest) if now <= newest => newest + ChronoDuration::microseconds(1),
            _ => now,
        }
    }

    fn persist(&self) {
        if let Err(err) = self.deps.repository.save(&self.ordered()) {
            warn!(error = %format!("{err:#}"), "failed to persist history");
        }
    }

    fn emit(&self, reason: ChangeReason, entry_id: Option<EntryId>) {
        // No subscribers is fine.
        let _ = self.events.send(HistoryChanged::new(reason, entry_id));
    }
}

fn write_plan(entry: &ClipboardEntry) -> Vec<ClipboardRepresentation> {
    if let Some(bundle) = &entry.format_bundle {
        if !bundle.is_empty() {
            return bundle
                .iter()
                .map(|blob| ClipboardRepresentation::raw(blob.format_id.clone(), blob.bytes.clone()))
                .collect();
        }
    }

    match (entry.kind(), &entry.rich_text_bytes, &entry.image_bytes) {
        (EntryKind::RichText, Some(rich), _) => {
            let mut plan = vec![ClipboardRepresentation::rich_text(rich.clone())];
            if entry.primary_text != RICH_TEXT_PLACEHOLDER {
                plan.push(ClipboardRepresentation::plain_text(entry.primary_text.clone()));
            }
            plan
        }
        (EntryKind::Image, _, Some(image)) => vec![ClipboardRepresentation::image(image.clone())],
        _ => vec![ClipboardRepresentation::plain_text(entry.primary_text.clone())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::FormatBlob;
    use crate::ids::FormatId;
    use crate::ports::mocks::{ManualClock, MockClipboard, MockRepo};
    use std::sync::Mutex;

    struct Harness {
        store: HistoryStore,
        clock: Arc<ManualClock>,
        suppressor: ChangeSuppressor,
    }

    fn quiet_repo() -> MockRepo {
        let mut repo = MockRepo::new();
        repo.expect_load().returning(|| Ok(Vec::new()));
        repo.expect_save().returning(|_| Ok(()));
        repo
    }

    fn harness_with(repo: MockRepo, clipboard: MockClipboard, max_unpinned: usize) -> Harness {
        let clock = Arc::new(ManualClock::at(1_700_000_000_000));
        let suppressor = ChangeSuppressor::new(clock.clone());
        let store = HistoryStore::new(
            HistoryStoreDeps {
                repository: Arc::new(repo),
                clipboard: Arc::new(clipboard),
                suppressor: suppressor.clone(),
                clock: clock.clone(),
            },
            max_unpinned,
        );
        Harness {
            store,
            clock,
            suppressor,
        }
    }

    fn harness(max_unpinned: usize) -> Harness {
        harness_with(quiet_repo(), MockClipboard::new(), max_unpinned)
    }

    fn texts(store: &HistoryStore) -> Vec<String> {
        store.ordered().into_iter().map(|e| e.primary_text).collect()
    }

    #[test]
    fn duplicate_text_merges_and_keeps_id_and_pin() {
        let mut h = harness(10);
        let a = h.store.add_entry(CapturedPayload::plain_text("A"));
        h.store.add_entry(CapturedPayload::plain_text("B"));
        assert!(h.store.toggle_pin(&a));

        h.clock.advance(10);
        let merged = h.store.add_entry(CapturedPayload::plain_text("A"));

        assert_eq!(merged, a);
        assert_eq!(h.store.len(), 2);
        let entry = h.store.get(&a).expect("entry");
        assert!(entry.pinned);
    }

    #[test]
    fn merged_entry_moves_to_front() {
        let mut h = harness(10);
        h.store.add_entry(CapturedPayload::plain_text("A"));
        h.store.add_entry(CapturedPayload::plain_text("B"));
        h.store.add_entry(CapturedPayload::plain_text("A"));
        assert_eq!(texts(&h.store), ["A", "B"]);
    }

    #[test]
    fn timestamps_strictly_increase_when_clock_stalls() {
        let mut h = harness(10);
        let a = h.store.add_entry(CapturedPayload::plain_text("A"));
        let b = h.store.add_entry(CapturedPayload::plain_text("B"));
        let ta = h.store.get(&a).expect("a").timestamp;
        let tb = h.store.get(&b).expect("b").timestamp;
        assert!(tb > ta);
    }

    #[test]
    fn capacity_evicts_oldest_unpinned_only() {
        let mut h = harness(2);
        let a = h.store.add_entry(CapturedPayload::plain_text("A"));
        h.store.toggle_pin(&a);
        for text in ["B", "C", "D"] {
            h.store.add_entry(CapturedPayload::plain_text(text));
        }
        assert_eq!(texts(&h.store), ["A", "D", "C"]);
        assert_eq!(h.store.unpinned_count(), 2);
    }

    #[test]
    fn unpinning_reapplies_capacity() {
        let mut h = harness(1);
        let a = h.store.add_entry(CapturedPayload::plain_text("A"));
        h.store.toggle_pin(&a);
        h.store.add_entry(CapturedPayload::plain_text("B"));

        h.store.toggle_pin(&a);

        assert_eq!(texts(&h.store), ["B"]);
    }

    #[test]
    fn missing_ids_are_noops() {
        let mut h = harness(5);
        let ghost = EntryId::from("ghost");
        assert!(!h.store.toggle_pin(&ghost));
        assert!(!h.store.delete(&ghost));
        assert!(!h.store.update_content(&ghost, "x"));
        assert!(!h.store.copy_to_system_clipboard(&ghost).expect("no error"));
    }

    #[test]
    fn update_content_rejects_non_plain_entries() {
        let mut h = harness(5);
        let image = h.store.add_entry(CapturedPayload {
            primary_text: "[Image]".into(),
            image_bytes: Some(vec![1, 2]),
            rich_text_bytes: None,
            format_bundle: None,
        });
        assert!(!h.store.update_content(&image, "caption"));
        assert_eq!(h.store.get(&image).expect("entry").primary_text, "[Image]");
    }

    #[test]
    fn update_content_of_newest_entry_syncs_clipboard_with_suppression() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = written.clone();
        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_write_representations()
            .times(1)
            .returning(move |reps| {
                sink.lock().expect("lock").extend_from_slice(reps);
                Ok(())
            });
        let mut h = harness_with(quiet_repo(), clipboard, 5);
        h.store.add_entry(CapturedPayload::plain_text("old"));
        let newest = h.store.add_entry(CapturedPayload::plain_text("draft"));

        assert!(h.store.update_content(&newest, "final"));

        let entry = h.store.get(&newest).expect("entry");
        assert_eq!(entry.primary_text, "final");
        assert!(entry.format_bundle.is_none());
        assert!(h.suppressor.is_armed());
        let written = written.lock().expect("lock");
        assert_eq!(written.as_slice(), [ClipboardRepresentation::plain_text("final")]);
    }

    #[test]
    fn update_content_of_older_unpinned_entry_leaves_clipboard_alone() {
        let mut clipboard = MockClipboard::new();
        clipboard.expect_write_representations().never();
        let mut h = harness_with(quiet_repo(), clipboard, 5);
        let older = h.store.add_entry(CapturedPayload::plain_text("older"));
        h.store.add_entry(CapturedPayload::plain_text("newer"));

        assert!(h.store.update_content(&older, "edited"));
        assert!(!h.suppressor.is_armed());
    }

    #[test]
    fn update_content_folds_duplicate_text() {
        let mut clipboard = MockClipboard::new();
        clipboard.expect_write_representations().returning(|_| Ok(()));
        let mut h = harness_with(quiet_repo(), clipboard, 5);
        let dup = h.store.add_entry(CapturedPayload::plain_text("same"));
        h.store.toggle_pin(&dup);
        let edited = h.store.add_entry(CapturedPayload::plain_text("other"));

        assert!(h.store.update_content(&edited, "same"));

        assert_eq!(h.store.len(), 1);
        let entry = h.store.get(&edited).expect("entry");
        assert!(entry.pinned);
        assert!(h.store.get(&dup).is_none());
    }

    #[test]
    fn copy_prefers_full_bundle() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = written.clone();
        let mut clipboard = MockClipboard::new();
        clipboard.expect_write_representations().returning(move |reps| {
            sink.lock().expect("lock").extend(reps.iter().map(|r| r.format_id.clone()));
            Ok(())
        });
        let mut h = harness_with(quiet_repo(), clipboard, 5);
        let id = h.store.add_entry(CapturedPayload {
            primary_text: "Hello".into(),
            image_bytes: None,
            rich_text_bytes: Some(b"{\\rtf1 Hello}".to_vec()),
            format_bundle: Some(vec![
                FormatBlob::new("public.rtf", b"{\\rtf1 Hello}".to_vec()),
                FormatBlob::new("public.utf8-plain-text", b"Hello".to_vec()),
                FormatBlob::new("com.acme.private", vec![7, 7]),
            ]),
        });

        assert!(h.store.copy_to_system_clipboard(&id).expect("copy"));

        let ids: Vec<FormatId> = written.lock().expect("lock").clone();
        assert_eq!(
            ids,
            [
                FormatId::from("public.rtf"),
                FormatId::from("public.utf8-plain-text"),
                FormatId::from("com.acme.private"),
            ]
        );
        assert!(h.suppressor.is_armed());
    }

    #[test]
    fn copy_without_bundle_writes_rich_text_with_plain_fallback() {
        let entry = ClipboardEntry {
            id: EntryId::new(),
            primary_text: "Hello".into(),
            timestamp: Utc::now(),
            pinned: false,
            image_bytes: None,
            rich_text_bytes: Some(b"{\\rtf1 Hello}".to_vec()),
            format_bundle: None,
        };
        let plan = write_plan(&entry);
        assert_eq!(
            plan,
            [
                ClipboardRepresentation::rich_text(b"{\\rtf1 Hello}".to_vec()),
                ClipboardRepresentation::plain_text("Hello"),
            ]
        );
    }

    #[test]
    fn failed_copy_disarms_suppressor() {
        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_write_representations()
            .returning(|_| Err(anyhow::anyhow!("clipboard busy")));
        let mut h = harness_with(quiet_repo(), clipboard, 5);
        let id = h.store.add_entry(CapturedPayload::plain_text("A"));

        let err = h.store.copy_to_system_clipboard(&id).expect_err("write fails");

        assert!(matches!(err, HistoryError::ClipboardWrite(msg) if msg.contains("clipboard busy")));
        assert!(!h.suppressor.is_armed());
    }

    #[test]
    fn persistence_failures_do_not_abort_mutations() {
        let mut repo = MockRepo::new();
        repo.expect_save()
            .returning(|_| Err(anyhow::anyhow!("disk full")));
        let mut h = harness_with(repo, MockClipboard::new(), 5);

        h.store.add_entry(CapturedPayload::plain_text("A"));

        assert_eq!(texts(&h.store), ["A"]);
    }

    #[test]
    fn failed_load_restores_empty_history() {
        let mut repo = MockRepo::new();
        repo.expect_load()
            .returning(|| Err(anyhow::anyhow!("malformed history file")));
        repo.expect_save().never();
        let mut h = harness_with(repo, MockClipboard::new(), 5);

        assert_eq!(h.store.restore(), 0);
        assert!(h.store.is_empty());
    }

    #[test]
    fn restore_applies_capacity_and_persists_trimmed_history() {
        let base = Utc::now();
        let loaded: Vec<ClipboardEntry> = (0..4)
            .map(|i| ClipboardEntry {
                id: EntryId::from(format!("e{i}")),
                primary_text: format!("text {i}"),
                timestamp: base - ChronoDuration::seconds(i),
                pinned: i == 3,
                image_bytes: None,
                rich_text_bytes: None,
                format_bundle: None,
            })
            .collect();
        let mut repo = MockRepo::new();
        repo.expect_load().return_once(move || Ok(loaded));
        repo.expect_save()
            .withf(|entries| entries.len() == 3)
            .times(1)
            .returning(|_| Ok(()));
        let mut h = harness_with(repo, MockClipboard::new(), 2);

        assert_eq!(h.store.restore(), 3);
        assert_eq!(texts(&h.store), ["text 3", "text 0", "text 1"]);
    }

    fn stored(id: &str, text: &str, age_secs: i64, pinned: bool) -> ClipboardEntry {
        ClipboardEntry {
            id: EntryId::from(id),
            primary_text: text.to_string(),
            timestamp: Utc::now() - ChronoDuration::seconds(age_secs),
            pinned,
            image_bytes: None,
            rich_text_bytes: None,
            format_bundle: None,
        }
    }

    #[test]
    fn restore_keeps_pin_of_dropped_older_duplicate() {
        let loaded = vec![
            stored("new", "same", 1, false),
            stored("other", "other", 2, false),
            stored("old", "same", 3, true),
        ];
        let mut repo = MockRepo::new();
        repo.expect_load().return_once(move || Ok(loaded));
        repo.expect_save()
            .withf(|entries| entries.len() == 2 && entries[0].id == EntryId::from("new"))
            .times(1)
            .returning(|_| Ok(()));
        let mut h = harness_with(repo, MockClipboard::new(), 5);

        assert_eq!(h.store.restore(), 2);
        let kept = h.store.get(&EntryId::from("new")).expect("kept entry");
        assert!(kept.pinned);
        assert!(h.store.get(&EntryId::from("old")).is_none());
    }

    #[test]
    fn load_history_trims_in_memory_without_saving() {
        let loaded = vec![
            stored("a", "a", 1, false),
            stored("b", "b", 2, false),
            stored("c", "c", 3, false),
            stored("a-dup", "a", 4, false),
        ];
        let mut repo = MockRepo::new();
        repo.expect_load().return_once(move || Ok(loaded));
        repo.expect_save().never();
        let mut h = harness_with(repo, MockClipboard::new(), 2);
        let mut rx = h.store.subscribe();

        assert_eq!(h.store.load_history(), 2);
        assert_eq!(texts(&h.store), ["a", "b"]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn pinned_group_orders_newest_first_and_survives_eviction() {
        let mut h = harness(3);
        let p1 = h.store.add_entry(CapturedPayload::plain_text("p1"));
        h.clock.advance(1);
        h.store.add_entry(CapturedPayload::plain_text("u1"));
        h.clock.advance(1);
        let p2 = h.store.add_entry(CapturedPayload::plain_text("p2"));
        assert!(h.store.toggle_pin(&p1));
        assert!(h.store.toggle_pin(&p2));
        for text in ["u2", "u3", "u4", "u5"] {
            h.clock.advance(1);
            h.store.add_entry(CapturedPayload::plain_text(text));
        }

        assert_eq!(h.store.len(), 5);
        assert_eq!(h.store.unpinned_count(), 3);
        assert_eq!(texts(&h.store), ["p2", "p1", "u5", "u4", "u3"]);
    }

    #[test]
    fn mutations_broadcast_change_events() {
        let mut h = harness(5);
        let mut rx = h.store.subscribe();

        let id = h.store.add_entry(CapturedPayload::plain_text("A"));
        h.store.add_entry(CapturedPayload::plain_text("A"));
        h.store.toggle_pin(&id);
        h.store.clear();

        let reasons: Vec<ChangeReason> =
            std::iter::from_fn(|| rx.try_recv().ok()).map(|e| e.reason).collect();
        assert_eq!(
            reasons,
            [
                ChangeReason::Added,
                ChangeReason::Merged,
                ChangeReason::PinToggled,
                ChangeReason::Cleared,
            ]
        );
    }

    #[test]
    fn clear_removes_pinned_entries() {
        let mut h = harness(5);
        let a = h.store.add_entry(CapturedPayload::plain_text("A"));
        h.store.toggle_pin(&a);
        h.store.clear();
        assert!(h.store.is_empty());
    }

    #[test]
    fn shrinking_capacity_evicts_immediately() {
        let mut h = harness(5);
        for text in ["A", "B", "C"] {
            h.store.add_entry(CapturedPayload::plain_text(text));
        }
        h.store.set_max_unpinned(1);
        assert_eq!(texts(&h.store), ["C"]);
        assert_eq!(h.store.max_unpinned(), 1);
        assert_eq!(h.store.apply_capacity_policy(0), 1);
        assert!(h.store.is_empty());
    }
}
