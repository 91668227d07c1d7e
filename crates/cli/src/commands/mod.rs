pub mod check;
pub mod init;
pub mod render;
pub mod serve;

use std::path::{Path, PathBuf};

use briefcast_config::AppConfig;

/// Resolve `--config`, falling back to `~/.briefcast/config.toml`.
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(AppConfig::config_path)
}

/// Load, override from the environment, and validate.
pub fn load_config(path: &Path) -> Result<AppConfig, Box<dyn std::error::Error>> {
    tracing::debug!(path = %path.display(), "Loading config");
    AppConfig::load_with_env(path).map_err(|e| format!("Failed to load config: {e}").into())
}
