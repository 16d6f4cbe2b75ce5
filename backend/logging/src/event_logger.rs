//! Command Event Logger
//!
//! One structured record per command transition, emitted on the `odo_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum CommandEvent {
    Received {
        driver: String,
        content: String,
    },
    Rejected {
        reason: String,
    },
    Duplicate,
    Recorded {
        date: String,
        odometer: String,
        difference: String,
    },
    Failed {
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub message_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: CommandEvent,
}

pub struct CommandEventLogger;

impl CommandEventLogger {
    /// Redact free-text fields and hand the entry to the tracing system.
    pub fn log_event(message_id: &str, event: CommandEvent) -> EventLogEntry {
        let entry = EventLogEntry {
            message_id: message_id.into(),
            timestamp: Utc::now(),
            event: Self::redact(event),
        };
        info!(target: "odo_events", event = ?entry, "Command event");
        entry
    }

    fn redact(mut event: CommandEvent) -> CommandEvent {
        match &mut event {
            CommandEvent::Received { content, .. } => *content = redact_sensitive_data(content),
            CommandEvent::Rejected { reason } => *reason = redact_sensitive_data(reason),
            CommandEvent::Failed { error_msg } => *error_msg = redact_sensitive_data(error_msg),
            CommandEvent::Duplicate | CommandEvent::Recorded { .. } => {}
        }
        event
    }
}
