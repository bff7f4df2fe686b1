//! Builds the engine's object graph.

use anyhow::{Context, Result};
use ch_app::{AppPaths, EngineConfig, HistoryEngine, HistoryHandle};
use ch_core::config::AppConfig;
use ch_core::ports::{AppDirsPort, ClockPort, SystemClipboardPort};
use ch_core::{
    ChangeSuppressor, ClipboardEntry, ClipboardPoller, ClipboardRepresentation, FormatCapture,
    HistoryStore, HistoryStoreDeps, SystemClipboardSnapshot,
};
use ch_infra::{ImageCrateProbe, JsonHistoryRepository, SystemClock};
use ch_platform::DirsAppDirsAdapter;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Default app locations, with the config file replaced by `config_override`.
pub fn resolve_app_paths(config_override: Option<PathBuf>) -> Result<AppPaths> {
    let app_dirs = DirsAppDirsAdapter::new()
        .get_app_dirs()
        .context("resolve application directories")?;
    let mut paths = AppPaths::from_app_dirs(&app_dirs);
    if let Some(config_path) = config_override {
        paths.config_path = config_path;
    }
    Ok(paths)
}

pub struct EngineParts {
    pub store: HistoryStore,
    pub poller: ClipboardPoller,
}

/// Store and poller sharing one suppressor, over the JSON history file at
/// `paths.history_path`.
pub fn build_engine_parts(
    config: &AppConfig,
    paths: &AppPaths,
    clipboard: Arc<dyn SystemClipboardPort>,
) -> EngineParts {
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);
    let suppressor = ChangeSuppressor::with_ttl(
        clock.clone(),
        Duration::from_millis(config.poller.suppress_ttl_ms),
    );
    let store = HistoryStore::new(
        HistoryStoreDeps {
            repository: Arc::new(JsonHistoryRepository::new(paths.history_path.clone())),
            clipboard,
            suppressor: suppressor.clone(),
            clock,
        },
        config.history.max_unpinned,
    );
    let poller = ClipboardPoller::new(FormatCapture::new(Arc::new(ImageCrateProbe::new())), suppressor);
    EngineParts { store, poller }
}

/// Restores history and spawns the engine task. Polling is left stopped.
pub fn spawn_engine(
    config: &AppConfig,
    paths: &AppPaths,
    clipboard: Arc<dyn SystemClipboardPort>,
) -> (HistoryHandle, JoinHandle<()>) {
    let EngineParts { mut store, poller } = build_engine_parts(config, paths, clipboard.clone());
    let restored = store.restore();
    info!(
        restored,
        history = %paths.history_path.display(),
        max_unpinned = config.history.max_unpinned,
        "history store ready"
    );
    HistoryEngine::spawn(store, poller, clipboard, EngineConfig::from(&config.poller))
}

/// Stand-in clipboard for commands that only touch the history file.
pub(crate) struct DetachedClipboard;

impl SystemClipboardPort for DetachedClipboard {
    fn read_snapshot(&self) -> Result<SystemClipboardSnapshot> {
        anyhow::bail!("system clipboard is not attached")
    }

    fn write_representations(&self, _: &[ClipboardRepresentation]) -> Result<()> {
        anyhow::bail!("system clipboard is not attached")
    }
}

fn offline_store(config: &AppConfig, paths: &AppPaths) -> HistoryStore {
    let EngineParts { store, .. } = build_engine_parts(config, paths, Arc::new(DetachedClipboard));
    store
}

/// Stored history in display order. The history file is only read.
pub fn list_history(config: &AppConfig, paths: &AppPaths) -> Vec<ClipboardEntry> {
    let mut store = offline_store(config, paths);
    store.load_history();
    store.ordered()
}

/// Empties the stored history. Returns how many entries were removed.
pub fn clear_history(config: &AppConfig, paths: &AppPaths) -> usize {
    let mut store = offline_store(config, paths);
    let removed = store.load_history();
    store.clear();
    removed
}
