//! `odolog-config`: runtime configuration for the odometer bot.
//!
//! Provides:
//! - Typed config schema (Discord, commands, ledger, OCR, logging)
//! - YAML loading from the config directory
//! - `${ENV_VAR}` substitution and well-known environment overrides
//! - Default value application
//! - Validation and redaction for display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides_with, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config};
pub use redact::{redact, redact_config};
pub use schema::{
    CommandsConfig, DiscordConfig, LedgerConfig, LedgerKind, LoggingConfig, OcrConfig,
    OdologConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load, substitute env vars, apply overrides and defaults.
///
/// This is the main entry point for loading a config at runtime. The result
/// is not validated; call [`validate`] before acting on it.
pub async fn load_and_prepare(path: &Path) -> Result<OdologConfig> {
    let env: HashMap<String, String> = std::env::vars().collect();
    load_and_prepare_with(path, &env).await
}

/// [`load_and_prepare`] against an explicit environment.
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<OdologConfig> {
    let raw_config = load_config(path).await?;

    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;
    let value =
        resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;
    let config: OdologConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides_with(config, |name| env.get(name).cloned())?;
    Ok(apply_all_defaults(config))
}

/// Log every warning and error in a report.
pub fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn file_env_and_defaults_compose() {
        let dir = tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(
            &path,
            "discord:\n  botToken: \"${BOT_SECRET}\"\nledger:\n  backend: memory\n",
        )
        .unwrap();

        let env: HashMap<String, String> = [
            ("BOT_SECRET".to_string(), "from-file-ref".to_string()),
            ("DRIVER_CHANNEL_ID".to_string(), "987".to_string()),
        ]
        .into_iter()
        .collect();

        let config = load_and_prepare_with(&path, &env).await.unwrap();
        let discord = config.discord.clone().unwrap();
        assert_eq!(discord.bot_token.as_deref(), Some("from-file-ref"));
        assert_eq!(discord.channel_id.as_deref(), Some("987"));
        assert_eq!(config.ledger.clone().unwrap().backend, Some(LedgerKind::Memory));
        assert_eq!(config.commands.clone().unwrap().prefix.as_deref(), Some("!odo"));
        assert!(validate(&config).is_valid());
    }

    #[tokio::test]
    async fn missing_file_reference_fails() {
        let dir = tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "ledger:\n  sheetId: \"${NOT_SET_ANYWHERE}\"\n").unwrap();

        let err = load_and_prepare_with(&path, &HashMap::new()).await.unwrap_err();
        assert!(format!("{err:#}").contains("NOT_SET_ANYWHERE"));
    }
}
