use ch_core::{ClipboardEntry, EntryId, HistoryChanged, PollOutcome, SystemClipboardSnapshot};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::command::HistoryCommand;
use super::error::EngineError;

/// Cloneable client of a running [`HistoryEngine`](super::HistoryEngine).
///
/// Every call is a request to the engine task. Once the engine has shut down
/// calls fail with [`EngineError::Closed`].
#[derive(Clone)]
pub struct HistoryHandle {
    commands: mpsc::Sender<HistoryCommand>,
    events: broadcast::Sender<HistoryChanged>,
}

impl HistoryHandle {
    pub(crate) fn new(
        commands: mpsc::Sender<HistoryCommand>,
        events: broadcast::Sender<HistoryChanged>,
    ) -> Self {
        Self { commands, events }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> HistoryCommand,
    ) -> Result<T, EngineError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| EngineError::Closed)?;
        rx.await.map_err(|_| EngineError::Closed)
    }

    /// History changes from now on. A lagging receiver skips events but
    /// can always re-query [`ordered`](Self::ordered).
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryChanged> {
        self.events.subscribe()
    }

    pub async fn ordered(&self) -> Result<Vec<ClipboardEntry>, EngineError> {
        self.request(|reply| HistoryCommand::Ordered { reply }).await
    }

    /// Routes an externally observed clipboard state through the same path
    /// as a poll cycle.
    pub async fn record_observation(
        &self,
        snapshot: SystemClipboardSnapshot,
    ) -> Result<PollOutcome, EngineError> {
        self.request(|reply| HistoryCommand::RecordObservation { snapshot, reply })
            .await
    }

    pub async fn toggle_pin(&self, id: EntryId) -> Result<bool, EngineError> {
        self.request(|reply| HistoryCommand::TogglePin { id, reply })
            .await
    }

    pub async fn delete(&self, id: EntryId) -> Result<bool, EngineError> {
        self.request(|reply| HistoryCommand::Delete { id, reply }).await
    }

    pub async fn update_content(
        &self,
        id: EntryId,
        text: impl Into<String>,
    ) -> Result<bool, EngineError> {
        let text = text.into();
        self.request(|reply| HistoryCommand::UpdateContent { id, text, reply })
            .await
    }

    pub async fn clear(&self) -> Result<(), EngineError> {
        self.request(|reply| HistoryCommand::Clear { reply }).await
    }

    pub async fn copy_to_system_clipboard(&self, id: EntryId) -> Result<bool, EngineError> {
        let copied = self
            .request(|reply| HistoryCommand::CopyToSystemClipboard { id, reply })
            .await??;
        Ok(copied)
    }

    pub async fn set_max_unpinned(&self, max_unpinned: usize) -> Result<(), EngineError> {
        self.request(|reply| HistoryCommand::SetMaxUnpinned {
            max_unpinned,
            reply,
        })
        .await
    }

    /// Makes the next observed clipboard change count as self-inflicted.
    pub async fn suppress_next_observation(&self) -> Result<(), EngineError> {
        self.request(|reply| HistoryCommand::SuppressNextObservation { reply })
            .await
    }

    pub async fn start_polling(&self) -> Result<(), EngineError> {
        self.request(|reply| HistoryCommand::StartPolling { reply })
            .await
    }

    pub async fn stop_polling(&self) -> Result<(), EngineError> {
        self.request(|reply| HistoryCommand::StopPolling { reply })
            .await
    }

    /// Runs one poll cycle immediately, regardless of polling state.
    pub async fn poll_now(&self) -> Result<PollOutcome, EngineError> {
        self.request(|reply| HistoryCommand::PollNow { reply })
            .await?
    }

    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.request(|reply| HistoryCommand::Shutdown { reply })
            .await
    }
}
