use anyhow::{bail, Context, Result};
use ch_core::ports::HistoryRepositoryPort;
use ch_core::ClipboardEntry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::record::{EntryRecord, HistoryFile, HISTORY_FILE_VERSION};

/// Stores the history as a single pretty-printed JSON document.
pub struct JsonHistoryRepository {
    path: PathBuf,
}

impl JsonHistoryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create history dir failed: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Writes to a sibling temp file, then renames it over the target, so
    /// readers see either the old or the new document.
    fn atomic_write(&self, content: &str) -> Result<()> {
        self.ensure_parent_dir()?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("write temp history failed: {}", tmp_path.display()))?;

        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "rename temp history to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

impl HistoryRepositoryPort for JsonHistoryRepository {
    fn load(&self) -> Result<Vec<ClipboardEntry>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no history file yet");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read history failed: {}", self.path.display()))
            }
        };

        let file: HistoryFile = serde_json::from_str(&content)
            .with_context(|| format!("parse history failed: {}", self.path.display()))?;
        if file.version != HISTORY_FILE_VERSION {
            bail!(
                "unsupported history file version {} (expected {})",
                file.version,
                HISTORY_FILE_VERSION
            );
        }

        let mut entries: Vec<ClipboardEntry> =
            file.entries.into_iter().map(ClipboardEntry::from).collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        debug!(entries = entries.len(), path = %self.path.display(), "history loaded");
        Ok(entries)
    }

    fn save(&self, entries: &[ClipboardEntry]) -> Result<()> {
        let file = HistoryFile {
            version: HISTORY_FILE_VERSION,
            entries: entries.iter().map(EntryRecord::from).collect(),
        };
        let content = serde_json::to_string_pretty(&file).context("serialize history failed")?;

        self.atomic_write(&content)
    }
}
