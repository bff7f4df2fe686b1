use std::sync::Arc;
use std::time::Duration;

use ch_core::config::{PollerConfig, DEFAULT_POLL_INTERVAL_MS};
use ch_core::ports::SystemClipboardPort;
use ch_core::{ClipboardPoller, HistoryStore, PollOutcome};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::command::HistoryCommand;
use super::error::EngineError;
use super::handle::HistoryHandle;

const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Consecutive read failures between repeated warnings.
const READ_FAILURE_LOG_EVERY: u32 = 10;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub poll_interval: Duration,
    /// Start polling as soon as the engine runs.
    pub start_polling: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            start_polling: false,
        }
    }
}

impl From<&PollerConfig> for EngineConfig {
    fn from(config: &PollerConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.interval_ms.max(1)),
            start_polling: false,
        }
    }
}

/// Owns the history store and the poller and runs every operation on them
/// from a single task, so poll cycles and commands never interleave.
pub struct HistoryEngine {
    store: HistoryStore,
    poller: ClipboardPoller,
    clipboard: Arc<dyn SystemClipboardPort>,
    commands: mpsc::Receiver<HistoryCommand>,
    config: EngineConfig,
    polling: bool,
    read_failures: u32,
    shutting_down: bool,
}

impl HistoryEngine {
    pub fn new(
        store: HistoryStore,
        poller: ClipboardPoller,
        clipboard: Arc<dyn SystemClipboardPort>,
        config: EngineConfig,
    ) -> (Self, HistoryHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let handle = HistoryHandle::new(tx, store.event_sender());
        let engine = Self {
            store,
            poller,
            clipboard,
            commands: rx,
            config,
            polling: false,
            read_failures: 0,
            shutting_down: false,
        };
        (engine, handle)
    }

    /// Spawns the engine onto the current tokio runtime.
    pub fn spawn(
        store: HistoryStore,
        poller: ClipboardPoller,
        clipboard: Arc<dyn SystemClipboardPort>,
        config: EngineConfig,
    ) -> (HistoryHandle, JoinHandle<()>) {
        let (engine, handle) = Self::new(store, poller, clipboard, config);
        (handle, tokio::spawn(engine.run()))
    }

    pub async fn run(mut self) {
        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            entries = self.store.len(),
            "history engine started"
        );
        if self.config.start_polling {
            self.start_polling();
        }

        while !self.shutting_down {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => {
                        debug!("all history handles dropped");
                        break;
                    }
                },
                _ = ticker.tick(), if self.polling => {
                    // Ignore the result; failures are logged inside.
                    let _ = self.poll_cycle();
                }
            }
        }

        info!("history engine stopped");
    }

    fn handle_command(&mut self, command: HistoryCommand) {
        match command {
            HistoryCommand::Ordered { reply } => {
                let _ = reply.send(self.store.ordered());
            }
            HistoryCommand::RecordObservation { snapshot, reply } => {
                let outcome = self.poller.observe(&snapshot, &mut self.store);
                let _ = reply.send(outcome);
            }
            HistoryCommand::TogglePin { id, reply } => {
                let _ = reply.send(self.store.toggle_pin(&id));
            }
            HistoryCommand::Delete { id, reply } => {
                let _ = reply.send(self.store.delete(&id));
            }
            HistoryCommand::UpdateContent { id, text, reply } => {
                let _ = reply.send(self.store.update_content(&id, &text));
            }
            HistoryCommand::Clear { reply } => {
                self.store.clear();
                let _ = reply.send(());
            }
            HistoryCommand::CopyToSystemClipboard { id, reply } => {
                let _ = reply.send(self.store.copy_to_system_clipboard(&id));
            }
            HistoryCommand::SetMaxUnpinned {
                max_unpinned,
                reply,
            } => {
                self.store.set_max_unpinned(max_unpinned);
                let _ = reply.send(());
            }
            HistoryCommand::SuppressNextObservation { reply } => {
                self.store.suppressor().arm();
                let _ = reply.send(());
            }
            HistoryCommand::StartPolling { reply } => {
                self.start_polling();
                let _ = reply.send(());
            }
            HistoryCommand::StopPolling { reply } => {
                if self.polling {
                    self.polling = false;
                    info!("clipboard polling stopped");
                }
                let _ = reply.send(());
            }
            HistoryCommand::PollNow { reply } => {
                let _ = reply.send(self.poll_cycle());
            }
            HistoryCommand::Shutdown { reply } => {
                self.polling = false;
                self.shutting_down = true;
                info!("history engine shutting down");
                let _ = reply.send(());
            }
        }
    }

    fn start_polling(&mut self) {
        if self.polling {
            debug!("clipboard polling already running");
            return;
        }
        // Content already on the clipboard is not a new copy.
        match self.clipboard.read_snapshot() {
            Ok(snapshot) => self.poller.prime(&snapshot),
            Err(err) => warn!(error = %format!("{err:#}"), "could not read clipboard baseline"),
        }
        self.polling = true;
        info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "clipboard polling started"
        );
    }

    fn poll_cycle(&mut self) -> Result<PollOutcome, EngineError> {
        let snapshot = match self.clipboard.read_snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.read_failures = self.read_failures.saturating_add(1);
                if self.read_failures == 1 || self.read_failures % READ_FAILURE_LOG_EVERY == 0 {
                    warn!(
                        failures = self.read_failures,
                        error = %format!("{err:#}"),
                        "clipboard read failed"
                    );
                }
                return Err(EngineError::ClipboardRead(format!("{err:#}")));
            }
        };

        if self.read_failures > 0 {
            info!(failures = self.read_failures, "clipboard readable again");
            self.read_failures = 0;
        }

        let outcome = self.poller.observe(&snapshot, &mut self.store);
        if let PollOutcome::Captured(id) = &outcome {
            debug!(
                entry_id = %id,
                representation_count = snapshot.representation_count(),
                total_bytes = snapshot.total_size_bytes(),
                "clipboard change captured"
            );
        }
        Ok(outcome)
    }
}
