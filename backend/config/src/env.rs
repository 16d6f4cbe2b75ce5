//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside string values, resolved at load time
//!   (`$${VAR}` escapes to a literal `${VAR}`).
//! - Well-known variables (`DISCORD_BOT_TOKEN`, `ODOLOG_LEDGER`, ...) that
//!   override the file outright. Empty variables count as unset.

use crate::schema::{LedgerKind, OdologConfig};
use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

/// `${VAR}` with an optional extra `$` for the escaped form.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references using a provided map.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() { k.clone() } else { format!("{path}.{k}") };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[1];
        if caps[0].starts_with("$$") {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    match missing {
        Some(err) => Err(err.into()),
        None => Ok(substituted.into_owned()),
    }
}

/// Apply overrides from an arbitrary lookup.
pub fn apply_env_overrides_with<F>(mut config: OdologConfig, lookup: F) -> Result<OdologConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let discord = config.discord.get_or_insert_with(Default::default);
    if let Some(v) = get("DISCORD_BOT_TOKEN") {
        discord.bot_token = Some(v);
    }
    if let Some(v) = get("DRIVER_CHANNEL_ID") {
        discord.channel_id = Some(v);
    }

    let commands = config.commands.get_or_insert_with(Default::default);
    if let Some(v) = get("ODOLOG_COMMAND_PREFIX") {
        commands.prefix = Some(v);
    }
    if let Some(v) = get("ODOLOG_DEDUP_CAPACITY") {
        commands.dedup_capacity = Some(parse_number("ODOLOG_DEDUP_CAPACITY", &v)?);
    }

    let ledger = config.ledger.get_or_insert_with(Default::default);
    if let Some(v) = get("ODOLOG_LEDGER") {
        let kind: LedgerKind = v.parse().map_err(|e: String| anyhow!(e)).context("ODOLOG_LEDGER")?;
        ledger.backend = Some(kind);
    }
    if let Some(v) = get("GOOGLE_SHEET_ID") {
        ledger.sheet_id = Some(v);
    }
    if let Some(v) = get("GOOGLE_SHEETS_ACCESS_TOKEN") {
        ledger.access_token = Some(v);
    }
    if let Some(v) = get("ODOLOG_SQLITE_PATH") {
        ledger.sqlite_path = Some(v);
    }
    if let Some(v) = get("ODOLOG_SHEET_NAME") {
        ledger.sheet_name = Some(v);
    }
    if let Some(v) = get("ODOLOG_LEDGER_TIMEOUT_SECS") {
        ledger.timeout_secs = Some(parse_number("ODOLOG_LEDGER_TIMEOUT_SECS", &v)?);
    }

    let ocr = config.ocr.get_or_insert_with(Default::default);
    if let Some(v) = get("ODOLOG_TESSERACT_BIN") {
        ocr.tesseract_bin = Some(v);
    }
    if let Some(v) = get("ODOLOG_OCR_LANGUAGE") {
        ocr.language = Some(v);
    }
    if let Some(v) = get("ODOLOG_OCR_TIMEOUT_SECS") {
        ocr.timeout_secs = Some(parse_number("ODOLOG_OCR_TIMEOUT_SECS", &v)?);
    }

    let logging = config.logging.get_or_insert_with(Default::default);
    if let Some(v) = get("RUST_LOG") {
        logging.level = Some(v);
    }
    if let Some(v) = get("ODOLOG_LOG_DIR") {
        logging.dir = Some(v);
    }

    Ok(config)
}

fn parse_number<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("{name} must be a non-negative integer, got '{raw}'"))
}
