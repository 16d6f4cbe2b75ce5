use std::path::{Path, PathBuf};

use anyhow::Result;
use odolog_config::{config_dir, config_file_path, load_and_prepare, OdologConfig};

/// Loaded runtime configuration plus the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: OdologConfig,
}

/// Config file to read: the `--config` flag wins over the config directory.
pub fn resolve_path(flag: Option<&Path>) -> PathBuf {
    match flag {
        Some(path) => path.to_path_buf(),
        None => config_file_path(&config_dir()),
    }
}

/// Load the file (if any) and layer the environment and defaults on top.
pub async fn load(flag: Option<&Path>) -> Result<LoadedConfig> {
    let path = resolve_path(flag);
    let config = load_and_prepare(&path).await?;
    Ok(LoadedConfig { path, config })
}
