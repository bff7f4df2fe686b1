use std::path::PathBuf;

use ch_core::app_dirs::AppDirs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub history_path: PathBuf,
    pub config_path: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    pub fn from_app_dirs(dirs: &AppDirs) -> Self {
        Self {
            history_path: dirs.app_data_root.join("history.json"),
            config_path: dirs.app_config_root.join("config.toml"),
            logs_dir: dirs.app_data_root.join("logs"),
        }
    }

    /// Uses `history_file` instead of the default location when set.
    pub fn with_history_override(mut self, history_file: Option<&PathBuf>) -> Self {
        if let Some(path) = history_file {
            self.history_path = path.clone();
        }
        self
    }
}
