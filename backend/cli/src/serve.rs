//! `odolog serve`: wire config into the command pipeline and connect to Discord.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use odolog_channels::{ChannelAdapter, DiscordAdapter};
use odolog_commands::{CommandProcessor, ProcessorSettings, DEFAULT_COMMAND_PREFIX};
use odolog_config::{log_report, validate, LedgerKind, OdologConfig};
use odolog_core::{LedgerBackend, DEFAULT_DEDUP_CAPACITY};
use odolog_ledger::{
    GoogleSheetsLedger, LedgerRanges, LedgerWriter, MemoryLedger, SqliteLedger,
    DEFAULT_LEDGER_TIMEOUT, DEFAULT_SHEET_NAME,
};
use odolog_understanding::{
    TesseractOcr, DEFAULT_OCR_LANGUAGE, DEFAULT_OCR_TIMEOUT, DEFAULT_TESSERACT_BIN,
};
use tracing::{info, warn};

/// Instantiate the configured ledger backend.
pub fn build_backend(config: &OdologConfig) -> Result<Arc<dyn LedgerBackend>> {
    let ledger = config.ledger.clone().unwrap_or_default();
    let backend: Arc<dyn LedgerBackend> = match ledger.backend.unwrap_or_default() {
        LedgerKind::Sheets => {
            let (Some(sheet_id), Some(token)) = (ledger.sheet_id, ledger.access_token) else {
                bail!("sheets backend needs both a spreadsheet id and an access token");
            };
            Arc::new(GoogleSheetsLedger::new(sheet_id, token))
        }
        LedgerKind::Sqlite => {
            let path = ledger
                .sqlite_path
                .context("sqlite backend needs a database path")?;
            Arc::new(SqliteLedger::open(&path)?)
        }
        LedgerKind::Memory => Arc::new(MemoryLedger::new()),
    };
    Ok(backend)
}

/// Ledger writer over `backend` with the configured sheet and timeout.
pub fn build_writer(config: &OdologConfig, backend: Arc<dyn LedgerBackend>) -> LedgerWriter {
    let ledger = config.ledger.clone().unwrap_or_default();
    let sheet = ledger.sheet_name.unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());
    let timeout = ledger
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_LEDGER_TIMEOUT);
    LedgerWriter::new(backend, LedgerRanges::for_sheet(&sheet)).with_timeout(timeout)
}

/// Command processor with OCR attached unless disabled.
pub fn build_processor(config: &OdologConfig, writer: Arc<LedgerWriter>) -> CommandProcessor {
    let commands = config.commands.clone().unwrap_or_default();
    let ocr = config.ocr.clone().unwrap_or_default();
    let ocr_timeout = ocr
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_OCR_TIMEOUT);

    let settings = ProcessorSettings {
        command_prefix: commands
            .prefix
            .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
        channel_id: config.discord.as_ref().and_then(|d| d.channel_id.clone()),
        dedup_capacity: commands.dedup_capacity.unwrap_or(DEFAULT_DEDUP_CAPACITY),
        ocr_timeout,
    };

    let processor = CommandProcessor::new(settings, writer);
    if ocr.enabled == Some(false) {
        info!("Photo OCR disabled");
        return processor;
    }
    let engine = TesseractOcr::new(
        ocr.tesseract_bin.unwrap_or_else(|| DEFAULT_TESSERACT_BIN.to_string()),
        ocr.language.unwrap_or_else(|| DEFAULT_OCR_LANGUAGE.to_string()),
        ocr_timeout,
    );
    processor.with_ocr(Arc::new(engine))
}

pub async fn run(config: OdologConfig) -> Result<()> {
    let report = validate(&config);
    log_report(&report);
    if !report.is_valid() {
        bail!("configuration has {} error(s); run `odolog config validate`", report.errors.len());
    }

    let backend = build_backend(&config)?;
    let writer = Arc::new(build_writer(&config, backend));
    info!(
        backend = writer.backend_name(),
        header = %writer.ranges().header,
        "Ledger ready"
    );
    if let Err(e) = writer.ensure_schema().await {
        // Retried on every append, so a cold start without connectivity is not fatal.
        warn!(error = %e, "Could not initialize ledger header");
    }

    let processor = Arc::new(build_processor(&config, writer));
    let token = config
        .discord
        .as_ref()
        .and_then(|d| d.bot_token.clone())
        .context("Discord bot token missing")?;
    let adapter = DiscordAdapter::new(token, processor);

    info!(adapter = adapter.name(), "Starting odometer bot");
    tokio::select! {
        result = adapter.start() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
    }
}
