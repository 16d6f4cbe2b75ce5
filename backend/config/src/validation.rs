//! Config validation: checks with user-friendly error messages.

use crate::schema::{LedgerKind, OdologConfig};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validate the config and return a report of all errors and warnings.
///
/// Expects defaults to have been applied; missing optional sections are skipped.
pub fn validate(config: &OdologConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_discord(config, &mut report);
    validate_commands(config, &mut report);
    validate_ledger(config, &mut report);
    validate_ocr(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn validate_discord(config: &OdologConfig, report: &mut ValidationReport) {
    let discord = config.discord.clone().unwrap_or_default();
    if is_blank(&discord.bot_token) {
        report.error("discord.botToken", "Bot token is required (set DISCORD_BOT_TOKEN)");
    }
    match discord.channel_id.as_deref() {
        None => report.warn(
            "discord.channelId",
            "No driver channel set; commands are accepted in every channel",
        ),
        Some(id) if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) => {
            report.error("discord.channelId", format!("Channel id must be numeric, got '{id}'"));
        }
        Some(_) => {}
    }
}

fn validate_commands(config: &OdologConfig, report: &mut ValidationReport) {
    let Some(commands) = &config.commands else { return };
    if let Some(prefix) = &commands.prefix {
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            report.error(
                "commands.prefix",
                "Prefix must be non-empty and contain no whitespace",
            );
        }
    }
    if commands.dedup_capacity == Some(0) {
        report.error("commands.dedupCapacity", "Capacity must be at least 1");
    }
}

fn validate_ledger(config: &OdologConfig, report: &mut ValidationReport) {
    let Some(ledger) = &config.ledger else { return };
    match ledger.backend.unwrap_or_default() {
        LedgerKind::Sheets => {
            if is_blank(&ledger.sheet_id) {
                report.error("ledger.sheetId", "Spreadsheet id is required (set GOOGLE_SHEET_ID)");
            }
            if is_blank(&ledger.access_token) {
                report.error(
                    "ledger.accessToken",
                    "Sheets access token is required (set GOOGLE_SHEETS_ACCESS_TOKEN)",
                );
            }
        }
        LedgerKind::Sqlite => {
            if is_blank(&ledger.sqlite_path) {
                report.error(
                    "ledger.sqlitePath",
                    "Database path is required for the sqlite backend",
                );
            }
        }
        LedgerKind::Memory => {
            report.warn("ledger.backend", "Memory ledger loses all readings on restart");
        }
    }
    if let Some(name) = &ledger.sheet_name {
        if name.trim().is_empty() {
            report.error("ledger.sheetName", "Sheet name cannot be empty");
        }
    }
    if ledger.timeout_secs == Some(0) {
        report.error("ledger.timeoutSecs", "Timeout must be at least 1 second");
    }
}

fn validate_ocr(config: &OdologConfig, report: &mut ValidationReport) {
    let Some(ocr) = &config.ocr else { return };
    if ocr.enabled == Some(false) {
        return;
    }
    if ocr.tesseract_bin.as_deref().is_some_and(|b| b.trim().is_empty()) {
        report.error("ocr.tesseractBin", "Tesseract binary cannot be empty");
    }
    if ocr.timeout_secs == Some(0) {
        report.error("ocr.timeoutSecs", "Timeout must be at least 1 second");
    }
}

fn validate_logging(config: &OdologConfig, report: &mut ValidationReport) {
    let Some(level) = config.logging.as_ref().and_then(|l| l.level.as_deref()) else { return };
    // Directive strings like "odolog=debug" are passed through to the filter as-is.
    if !level.contains('=') && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        report.warn("logging.level", format!("Unknown log level '{level}'"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;
    use crate::schema::{DiscordConfig, LedgerConfig};

    fn valid() -> OdologConfig {
        let mut config = OdologConfig::default();
        config.discord = Some(DiscordConfig {
            bot_token: Some("token".into()),
            channel_id: Some("123456".into()),
        });
        config.ledger = Some(LedgerConfig {
            sheet_id: Some("sheet".into()),
            access_token: Some("ya29.x".into()),
            ..Default::default()
        });
        apply_all_defaults(config)
    }

    fn paths(errors: &[ConfigValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn complete_config_is_valid() {
        let report = validate(&valid());
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn sheets_backend_requires_credentials() {
        let report = validate(&apply_all_defaults(OdologConfig::default()));
        let errors = paths(&report.errors);
        assert!(errors.contains(&"discord.botToken"));
        assert!(errors.contains(&"ledger.sheetId"));
        assert!(errors.contains(&"ledger.accessToken"));
        assert!(paths(&report.warnings).contains(&"discord.channelId"));
    }

    #[test]
    fn memory_backend_only_warns() {
        let mut config = valid();
        config.ledger = Some(LedgerConfig {
            backend: Some(LedgerKind::Memory),
            ..Default::default()
        });
        let report = validate(&apply_all_defaults(config));
        assert!(report.is_valid());
        assert_eq!(paths(&report.warnings), vec!["ledger.backend"]);
    }

    #[test]
    fn rejects_bad_prefix_capacity_and_channel() {
        let mut config = valid();
        let commands = config.commands.as_mut().unwrap();
        commands.prefix = Some("! odo".into());
        commands.dedup_capacity = Some(0);
        config.discord.as_mut().unwrap().channel_id = Some("#drivers".into());

        let report = validate(&config);
        let errors = paths(&report.errors);
        assert!(errors.contains(&"commands.prefix"));
        assert!(errors.contains(&"commands.dedupCapacity"));
        assert!(errors.contains(&"discord.channelId"));
    }

    #[test]
    fn unknown_log_level_warns() {
        let mut config = valid();
        config.logging.as_mut().unwrap().level = Some("chatty".into());
        assert_eq!(paths(&validate(&config).warnings), vec!["logging.level"]);

        config.logging.as_mut().unwrap().level = Some("odolog_commands=debug".into());
        assert!(validate(&config).warnings.is_empty());
    }
}
