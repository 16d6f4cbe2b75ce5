//! Config defaults: applies sensible default values to parsed config.

use crate::schema::{
    CommandsConfig, DiscordConfig, LedgerConfig, LedgerKind, LoggingConfig, OcrConfig,
    OdologConfig,
};

pub use odolog_commands::DEFAULT_COMMAND_PREFIX;
pub use odolog_core::DEFAULT_DEDUP_CAPACITY;
pub use odolog_ledger::DEFAULT_SHEET_NAME;
pub use odolog_understanding::{DEFAULT_OCR_LANGUAGE, DEFAULT_TESSERACT_BIN};

pub const DEFAULT_SQLITE_PATH: &str = "odolog.db";

pub const DEFAULT_LEDGER_TIMEOUT_SECS: u64 = odolog_ledger::DEFAULT_LEDGER_TIMEOUT.as_secs();

pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = odolog_understanding::DEFAULT_OCR_TIMEOUT.as_secs();

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: OdologConfig) -> OdologConfig {
    let config = apply_command_defaults(config);
    let config = apply_ledger_defaults(config);
    let config = apply_ocr_defaults(config);
    apply_logging_defaults(config)
}

fn apply_command_defaults(mut config: OdologConfig) -> OdologConfig {
    config.discord.get_or_insert_with(DiscordConfig::default);
    let commands = config.commands.get_or_insert_with(CommandsConfig::default);
    commands
        .prefix
        .get_or_insert_with(|| DEFAULT_COMMAND_PREFIX.to_string());
    commands.dedup_capacity.get_or_insert(DEFAULT_DEDUP_CAPACITY);
    config
}

/// The SQLite path is only filled in when that backend is selected.
fn apply_ledger_defaults(mut config: OdologConfig) -> OdologConfig {
    let ledger = config.ledger.get_or_insert_with(LedgerConfig::default);
    let backend = *ledger.backend.get_or_insert(LedgerKind::default());
    ledger
        .sheet_name
        .get_or_insert_with(|| DEFAULT_SHEET_NAME.to_string());
    ledger.timeout_secs.get_or_insert(DEFAULT_LEDGER_TIMEOUT_SECS);
    if backend == LedgerKind::Sqlite {
        ledger
            .sqlite_path
            .get_or_insert_with(|| DEFAULT_SQLITE_PATH.to_string());
    }
    config
}

fn apply_ocr_defaults(mut config: OdologConfig) -> OdologConfig {
    let ocr = config.ocr.get_or_insert_with(OcrConfig::default);
    ocr.enabled.get_or_insert(true);
    ocr.tesseract_bin
        .get_or_insert_with(|| DEFAULT_TESSERACT_BIN.to_string());
    ocr.language
        .get_or_insert_with(|| DEFAULT_OCR_LANGUAGE.to_string());
    ocr.timeout_secs.get_or_insert(DEFAULT_OCR_TIMEOUT_SECS);
    config
}

fn apply_logging_defaults(mut config: OdologConfig) -> OdologConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_section() {
        let config = apply_all_defaults(OdologConfig::default());
        let commands = config.commands.unwrap();
        assert_eq!(commands.prefix.as_deref(), Some("!odo"));
        assert_eq!(commands.dedup_capacity, Some(100));

        let ledger = config.ledger.unwrap();
        assert_eq!(ledger.backend, Some(LedgerKind::Sheets));
        assert_eq!(ledger.sheet_name.as_deref(), Some("Drivers_Mileage"));
        assert_eq!(ledger.timeout_secs, Some(30));
        assert_eq!(ledger.sqlite_path, None);

        let ocr = config.ocr.unwrap();
        assert_eq!(ocr.enabled, Some(true));
        assert_eq!(ocr.tesseract_bin.as_deref(), Some("tesseract"));
        assert_eq!(ocr.language.as_deref(), Some("eng"));
        assert_eq!(ocr.timeout_secs, Some(60));

        assert_eq!(config.logging.unwrap().level.as_deref(), Some("info"));
    }

    #[test]
    fn keeps_explicit_values() {
        let mut config = OdologConfig::default();
        config.ledger = Some(LedgerConfig {
            backend: Some(LedgerKind::Sqlite),
            timeout_secs: Some(5),
            ..Default::default()
        });
        let ledger = apply_all_defaults(config).ledger.unwrap();
        assert_eq!(ledger.timeout_secs, Some(5));
        assert_eq!(ledger.sqlite_path.as_deref(), Some("odolog.db"));
    }

    #[test]
    fn idempotent() {
        let once = apply_all_defaults(OdologConfig::default());
        assert_eq!(apply_all_defaults(once.clone()), once);
    }
}
