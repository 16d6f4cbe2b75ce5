//! Config file discovery and loading.

use crate::schema::OdologConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the config directory.
/// Priority: `ODOLOG_CONFIG_DIR` env > `~/.odolog/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ODOLOG_CONFIG_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    match dirs::home_dir() {
        Some(home) => home.join(".odolog"),
        None => PathBuf::from(".odolog"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist, so an
/// environment-only deployment needs no file at all.
pub async fn load_config(path: &Path) -> Result<OdologConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(OdologConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if raw.trim().is_empty() {
        return Ok(OdologConfig::default());
    }

    let config: OdologConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_file_yields_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.yaml");
        assert_eq!(load_config(&path).await.unwrap(), OdologConfig::default());
    }

    #[tokio::test]
    async fn reads_yaml_file() {
        let dir = tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "commands:\n  prefix: \"!km\"\n").unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.commands.unwrap().prefix.as_deref(), Some("!km"));
    }

    #[tokio::test]
    async fn malformed_yaml_names_the_file() {
        let dir = tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "commands: [unclosed\n").unwrap();

        let err = load_config(&path).await.unwrap_err();
        assert!(err.to_string().contains("config.yaml"));
    }

    #[test]
    fn config_file_lives_in_dir() {
        assert_eq!(
            config_file_path(Path::new("/etc/odolog")),
            PathBuf::from("/etc/odolog/config.yaml")
        );
    }
}
