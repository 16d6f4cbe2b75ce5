//! Runtime configuration schema, typed for serde YAML/JSON.
//!
//! Every field is optional on disk; [`crate::apply_all_defaults`] fills the gaps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root configuration (`config.yaml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OdologConfig {
    /// Discord gateway connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<DiscordConfig>,

    /// Command detection and deduplication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<CommandsConfig>,

    /// Ledger backend selection and credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger: Option<LedgerConfig>,

    /// Photo text recognition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    /// Only messages from this channel are handled when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// How many recent message ids are remembered for duplicate suppression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedup_capacity: Option<usize>,
}

/// Which ledger implementation backs the bot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    #[default]
    Sheets,
    Sqlite,
    Memory,
}

impl fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LedgerKind::Sheets => "sheets",
            LedgerKind::Sqlite => "sqlite",
            LedgerKind::Memory => "memory",
        })
    }
}

impl FromStr for LedgerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sheets" | "google-sheets" | "gsheets" => Ok(LedgerKind::Sheets),
            "sqlite" => Ok(LedgerKind::Sqlite),
            "memory" => Ok(LedgerKind::Memory),
            other => Err(format!(
                "unknown ledger backend '{other}' (expected sheets, sqlite or memory)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<LedgerKind>,

    /// Google spreadsheet id (sheets backend)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<String>,

    /// OAuth bearer token for the Sheets API (sheets backend)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Database file (sqlite backend)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqlite_path: Option<String>,

    /// Tab holding the ledger rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrConfig {
    /// Disable to skip photo processing entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tesseract_bin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for the rolling JSON log file. Console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
discord:
  botToken: abc
  channelId: "123456789"
commands:
  prefix: "!km"
  dedupCapacity: 50
ledger:
  backend: sqlite
  sqlitePath: /var/lib/odolog/ledger.db
ocr:
  enabled: false
"#;
        let config: OdologConfig = serde_yaml::from_str(yaml).unwrap();
        let discord = config.discord.unwrap();
        assert_eq!(discord.bot_token.as_deref(), Some("abc"));
        assert_eq!(discord.channel_id.as_deref(), Some("123456789"));
        assert_eq!(config.commands.unwrap().dedup_capacity, Some(50));
        let ledger = config.ledger.unwrap();
        assert_eq!(ledger.backend, Some(LedgerKind::Sqlite));
        assert_eq!(ledger.sqlite_path.as_deref(), Some("/var/lib/odolog/ledger.db"));
        assert_eq!(config.ocr.unwrap().enabled, Some(false));
        assert!(config.logging.is_none());
    }

    #[test]
    fn ledger_kind_from_str() {
        assert_eq!("SQLite".parse::<LedgerKind>(), Ok(LedgerKind::Sqlite));
        assert_eq!("google-sheets".parse::<LedgerKind>(), Ok(LedgerKind::Sheets));
        assert!("postgres".parse::<LedgerKind>().unwrap_err().contains("postgres"));
        assert_eq!(LedgerKind::Memory.to_string(), "memory");
    }

    #[test]
    fn empty_sections_are_not_serialized() {
        let yaml = serde_yaml::to_string(&OdologConfig::default()).unwrap();
        assert_eq!(yaml.trim(), "{}");
    }
}
