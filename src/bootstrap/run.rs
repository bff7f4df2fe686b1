use anyhow::{bail, Context, Result};
use ch_app::{AppPaths, HistoryHandle};
use ch_core::config::AppConfig;
use ch_core::ClipboardEntry;
use ch_platform::ClipboardRsClipboard;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::config::load_config;
use super::tracing::init_tracing_subscriber;
use super::wiring::{clear_history, list_history, resolve_app_paths, spawn_engine};
use crate::cli::{Cli, Command};

const PREVIEW_CHARS: usize = 80;

pub async fn run(cli: Cli) -> Result<()> {
    let paths = resolve_app_paths(cli.config.clone())?;
    init_tracing_subscriber(Some(&paths.logs_dir))?;

    let config = load_config(&paths.config_path)?;
    let paths = paths.with_history_override(config.history.history_file.as_ref());
    debug!(config = %paths.config_path.display(), ?config, "configuration loaded");

    match cli.command() {
        Command::Run => run_daemon(&config, &paths).await,
        Command::List { limit } => {
            let entries = list_history(&config, &paths);
            let shown = limit.unwrap_or(entries.len());
            for entry in entries.iter().take(shown) {
                println!("{}", format_entry(entry));
            }
            Ok(())
        }
        Command::Clear => {
            let removed = clear_history(&config, &paths);
            println!("removed {removed} entries");
            Ok(())
        }
    }
}

async fn run_daemon(config: &AppConfig, paths: &AppPaths) -> Result<()> {
    let clipboard = Arc::new(ClipboardRsClipboard::new().context("open system clipboard")?);
    let (handle, task) = spawn_engine(config, paths, clipboard);

    handle.start_polling().await?;
    info!(
        interval_ms = config.poller.interval_ms,
        "recording clipboard history, press Ctrl-C to stop"
    );

    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
        }
    };
    supervise(handle, task, ctrl_c).await?;
    info!("stopped");
    Ok(())
}

/// Logs history changes until `stop` resolves, then shuts the engine down.
/// Fails if the engine task ends on its own first.
async fn supervise(
    handle: HistoryHandle,
    mut task: JoinHandle<()>,
    stop: impl Future<Output = ()>,
) -> Result<()> {
    let mut events = handle.subscribe();
    let mut events_open = true;
    tokio::pin!(stop);

    loop {
        tokio::select! {
            _ = &mut stop => break,
            joined = &mut task => {
                joined.context("engine task failed")?;
                bail!("history engine stopped unexpectedly");
            }
            event = events.recv(), if events_open => match event {
                Ok(change) => {
                    debug!(reason = ?change.reason, entry_id = ?change.entry_id, "history changed");
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "history event listener lagged");
                }
                Err(RecvError::Closed) => events_open = false,
            },
        }
    }

    if let Err(err) = handle.shutdown().await {
        debug!(error = %err, "engine already stopped");
    }
    task.await.context("engine task failed")?;
    Ok(())
}

fn format_entry(entry: &ClipboardEntry) -> String {
    let marker = if entry.pinned { '*' } else { ' ' };
    let first_line = entry.primary_text.lines().next().unwrap_or_default();
    let mut preview: String = first_line.chars().take(PREVIEW_CHARS).collect();
    if first_line.chars().count() > PREVIEW_CHARS || entry.primary_text.lines().nth(1).is_some() {
        preview.push_str("...");
    }
    format!(
        "{marker} {} {:<9} {preview}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        format!("{:?}", entry.kind()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::wiring::DetachedClipboard;
    use ch_app::EngineError;
    use ch_core::EntryId;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn detached_engine(dir: &TempDir) -> (HistoryHandle, JoinHandle<()>) {
        let paths = AppPaths {
            history_path: dir.path().join("history.json"),
            config_path: dir.path().join("config.toml"),
            logs_dir: dir.path().join("logs"),
        };
        spawn_engine(&AppConfig::default(), &paths, Arc::new(DetachedClipboard))
    }

    #[tokio::test]
    async fn supervise_shuts_engine_down_when_stopped() {
        let dir = TempDir::new().unwrap();
        let (handle, task) = detached_engine(&dir);

        supervise(handle.clone(), task, async {}).await.unwrap();

        assert!(matches!(handle.ordered().await, Err(EngineError::Closed)));
    }

    #[tokio::test]
    async fn supervise_fails_when_engine_task_ends_first() {
        let dir = TempDir::new().unwrap();
        let (handle, task) = detached_engine(&dir);
        task.abort();

        let result = supervise(handle, task, std::future::pending()).await;

        assert!(result.is_err());
    }

    fn entry(text: &str, pinned: bool) -> ClipboardEntry {
        ClipboardEntry {
            id: EntryId::from("e1"),
            primary_text: text.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
            pinned,
            image_bytes: None,
            rich_text_bytes: None,
            format_bundle: None,
        }
    }

    #[test]
    fn pinned_entries_are_marked() {
        let line = format_entry(&entry("hello", true));
        assert!(line.starts_with("* 2024-03-01 12:30:00"));
        assert!(line.ends_with("hello"));
        assert!(format_entry(&entry("hello", false)).starts_with("  "));
    }

    #[test]
    fn multiline_text_is_cut_to_first_line() {
        let line = format_entry(&entry("first\nsecond", false));
        assert!(line.ends_with("first..."));
    }
}
