//! Application configuration domain model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MAX_UNPINNED: usize = 50;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_SUPPRESS_TTL_MS: u64 = 500;

/// Application configuration.
///
/// Every field has a default, so a partial (or absent) config file is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub history: HistoryConfig,
    pub poller: PollerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of unpinned entries retained. Pinned entries never count.
    pub max_unpinned: usize,

    /// History file location; resolved from the app data dir when unset.
    #[serde(rename = "file", skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_unpinned: DEFAULT_MAX_UNPINNED,
            history_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    pub interval_ms: u64,

    /// How long a programmatic clipboard write stays suppressed.
    pub suppress_ttl_ms: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            suppress_ttl_ms: DEFAULT_SUPPRESS_TTL_MS,
        }
    }
}
