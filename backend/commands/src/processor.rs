//! Command processor: the per-message state machine behind `!odo`.
//!
//! Every inbound message ends in exactly one terminal state:
//! `Ignored`, `Rejected`, `Succeeded`, or `Failed`. Between acceptance and a
//! terminal state the message is `Processing` and carries the ⏳ reaction.
//! This is the only error boundary for a command; nothing escapes `handle`.

use std::sync::Arc;
use std::time::Duration;

use odolog_core::{
    Clock, Difference, FeedbackChannel, IncomingMessage, OcrEngine, OdoError, OdoResult,
    OdometerEvent, ProcessedMessageSet, Reaction, SystemClock, DEFAULT_DEDUP_CAPACITY,
};
use odolog_ledger::LedgerWriter;
use odolog_logging::{CommandEvent, CommandEventLogger};
use odolog_understanding::{extract_fields, ExtractedFields, DEFAULT_OCR_TIMEOUT};
use tokio::sync::Mutex;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::detection::{detect_command, Detection, DEFAULT_COMMAND_PREFIX};
use crate::reply;

#[derive(Debug, Clone)]
pub struct ProcessorSettings {
    pub command_prefix: String,
    /// Only messages from this channel are considered, when set.
    pub channel_id: Option<String>,
    pub dedup_capacity: usize,
    pub ocr_timeout: Duration,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            channel_id: None,
            dedup_capacity: DEFAULT_DEDUP_CAPACITY,
            ocr_timeout: DEFAULT_OCR_TIMEOUT,
        }
    }
}

/// Why a message was ignored. Ignored messages get no reaction and no reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    FromBot,
    OtherChannel,
    NotCommand,
    /// Already processed (re-delivered event).
    Duplicate,
}

/// Terminal state of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Ignored(IgnoreReason),
    Rejected(String),
    Succeeded {
        event: OdometerEvent,
        difference: Difference,
    },
    Failed(String),
}

impl CommandOutcome {
    pub fn state_name(&self) -> &'static str {
        match self {
            CommandOutcome::Ignored(_) => "ignored",
            CommandOutcome::Rejected(_) => "rejected",
            CommandOutcome::Succeeded { .. } => "succeeded",
            CommandOutcome::Failed(_) => "failed",
        }
    }
}

pub struct CommandProcessor {
    settings: ProcessorSettings,
    processed: Mutex<ProcessedMessageSet>,
    ocr: Option<Arc<dyn OcrEngine>>,
    writer: Arc<LedgerWriter>,
    clock: Arc<dyn Clock>,
}

impl CommandProcessor {
    pub fn new(settings: ProcessorSettings, writer: Arc<LedgerWriter>) -> Self {
        let processed = Mutex::new(ProcessedMessageSet::new(settings.dedup_capacity));
        Self {
            settings,
            processed,
            ocr: None,
            writer,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_ocr(mut self, ocr: Arc<dyn OcrEngine>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    /// Number of message ids currently remembered for deduplication.
    pub async fn remembered(&self) -> usize {
        self.processed.lock().await.len()
    }

    /// Drive one message to its terminal state.
    pub async fn handle(
        &self,
        msg: &IncomingMessage,
        feedback: &dyn FeedbackChannel,
    ) -> CommandOutcome {
        let span = info_span!("command", message_id = %msg.id, author = %msg.author);
        async {
            let outcome = self.transition(msg, feedback).await;
            debug!(state = outcome.state_name(), "Command finished");
            outcome
        }
        .instrument(span)
        .await
    }

    async fn transition(
        &self,
        msg: &IncomingMessage,
        feedback: &dyn FeedbackChannel,
    ) -> CommandOutcome {
        if msg.author_is_bot {
            return CommandOutcome::Ignored(IgnoreReason::FromBot);
        }
        if let Some(channel) = &self.settings.channel_id {
            if &msg.channel_id != channel {
                return CommandOutcome::Ignored(IgnoreReason::OtherChannel);
            }
        }

        let reading = match detect_command(&msg.content, &self.settings.command_prefix) {
            Detection::NotCommand => return CommandOutcome::Ignored(IgnoreReason::NotCommand),
            Detection::InvalidReading => {
                let reason = OdoError::Validation(format!(
                    "expected `{} <5-7 digits>`",
                    self.settings.command_prefix
                ))
                .to_string();
                CommandEventLogger::log_event(
                    &msg.id,
                    CommandEvent::Rejected { reason: reason.clone() },
                );
                let hint = reply::usage_hint(&self.settings.command_prefix);
                soft("send usage hint", feedback.reply(&hint).await);
                return CommandOutcome::Rejected(reason);
            }
            Detection::Reading(reading) => reading,
        };

        if !self.processed.lock().await.check_and_insert(&msg.id) {
            warn!("Message already processed, skipping");
            CommandEventLogger::log_event(&msg.id, CommandEvent::Duplicate);
            return CommandOutcome::Ignored(IgnoreReason::Duplicate);
        }

        CommandEventLogger::log_event(
            &msg.id,
            CommandEvent::Received {
                driver: msg.author.clone(),
                content: msg.content.clone(),
            },
        );
        info!(odometer = %reading, state = "processing", "Command accepted");
        soft("add in-progress reaction", feedback.react(Reaction::InProgress).await);

        match self.process(msg, reading).await {
            Ok((event, difference)) => {
                soft("remove in-progress reaction", feedback.unreact(Reaction::InProgress).await);
                soft("remove error reaction", feedback.unreact(Reaction::Error).await);
                soft("add success reaction", feedback.react(Reaction::Success).await);
                let summary = reply::success_summary(&event, difference);
                soft("send summary", feedback.reply(&summary).await);

                CommandEventLogger::log_event(
                    &msg.id,
                    CommandEvent::Recorded {
                        date: event.date.clone(),
                        odometer: event.odometer_reading.clone(),
                        difference: difference.to_string(),
                    },
                );
                CommandOutcome::Succeeded { event, difference }
            }
            Err(e) => {
                report(&e, "Error processing odometer command");
                let error_msg = e.to_string();
                soft("remove in-progress reaction", feedback.unreact(Reaction::InProgress).await);
                soft("add error reaction", feedback.react(Reaction::Error).await);
                let failure = reply::failure_message(&error_msg);
                soft("send failure reply", feedback.reply(&failure).await);

                CommandEventLogger::log_event(
                    &msg.id,
                    CommandEvent::Failed { error_msg: error_msg.clone() },
                );
                CommandOutcome::Failed(error_msg)
            }
        }
    }

    /// Photo metadata → defaults → ledger.
    async fn process(
        &self,
        msg: &IncomingMessage,
        reading: String,
    ) -> OdoResult<(OdometerEvent, Difference)> {
        let fields = self.read_photo(msg).await;

        let event = OdometerEvent {
            date: fields.date.unwrap_or_else(|| self.clock.date_string()),
            time: fields.time.unwrap_or_else(|| self.clock.time_string()),
            location: fields.location,
            odometer_reading: reading,
            driver: msg.author.clone(),
        };
        if !event.is_complete() {
            return Err(OdoError::Validation("event is missing its driver".into()));
        }

        let difference = self.writer.record(&event).await?;
        Ok((event, difference))
    }

    /// Best-effort OCR of the first image attachment. Failures degrade to no fields.
    async fn read_photo(&self, msg: &IncomingMessage) -> ExtractedFields {
        let (Some(ocr), Some(image)) = (&self.ocr, msg.first_image()) else {
            return ExtractedFields::default();
        };
        info!(
            file = %image.filename,
            engine = ocr.name(),
            "Extracting metadata from attached photo"
        );

        let timeout = self.settings.ocr_timeout;
        let text = match tokio::time::timeout(timeout, ocr.recognize(image)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                report(&OdoError::Extraction(e.to_string()), "Continuing without photo metadata");
                return ExtractedFields::default();
            }
            Err(_) => {
                let e = OdoError::Extraction(format!("OCR timed out after {timeout:?}"));
                report(&e, "Continuing without photo metadata");
                return ExtractedFields::default();
            }
        };
        debug!(text = %text, "Photo text");

        let fields = extract_fields(&text);
        info!(
            date = ?fields.date,
            time = ?fields.time,
            location = ?fields.location,
            "Photo metadata extracted"
        );
        fields
    }
}

/// Feedback delivery never affects the outcome; failures are logged only.
fn soft(what: &str, result: anyhow::Result<()>) {
    if let Err(e) = result {
        report(&OdoError::Feedback(e.to_string()), &format!("Could not {what}"));
    }
}

/// Fatal errors are logged at error level, degradations at warn.
fn report(e: &OdoError, context: &str) {
    if e.is_fatal() {
        error!(error = %e, "{context}");
    } else {
        warn!(error = %e, "{context}");
    }
}
