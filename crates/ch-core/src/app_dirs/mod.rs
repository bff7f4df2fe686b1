use std::path::PathBuf;

/// Per-user application directories, as resolved by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub app_data_root: PathBuf,
    pub app_config_root: PathBuf,
}
