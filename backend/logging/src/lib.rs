//! Structured logging for odolog.
//!
//! Console + rolling NDJSON file output, log redaction, and the per-command event logger.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{CommandEvent, CommandEventLogger, EventLogEntry};
pub use logger::{init_console_logger, init_logger};
pub use redact::redact_sensitive_data;
