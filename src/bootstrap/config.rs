//! Configuration loader.
//!
//! Reads the TOML config file into [`AppConfig`]. Missing sections and keys
//! take their defaults; a missing file means all defaults.

use anyhow::Context;
use ch_core::config::AppConfig;
use std::path::Path;

pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })
        }
    };
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config as TOML: {}", config_path.display()))
}
