use anyhow::Result;
use async_trait::async_trait;

use crate::error::OdoResult;
use crate::message::Attachment;

/// Optical character recognition over an image attachment.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Engine name for logging.
    fn name(&self) -> &str;

    /// Return the recognized text as a single block.
    async fn recognize(&self, image: &Attachment) -> Result<String>;
}

/// Tabular ledger addressed by A1-style ranges (e.g. `Drivers_Mileage!A:F`).
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Read all rows in the range, oldest first. Trailing empty cells may be omitted.
    async fn read_range(&self, range: &str) -> OdoResult<Vec<Vec<String>>>;

    /// Overwrite the cells of the range in place.
    async fn write_range(&self, range: &str, rows: Vec<Vec<String>>) -> OdoResult<()>;

    /// Append rows after the last row of the range. The backend picks the row index.
    async fn append_rows(&self, range: &str, rows: Vec<Vec<String>>) -> OdoResult<()>;
}

/// Reaction markers shown on a command message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    InProgress,
    Success,
    Error,
}

impl Reaction {
    pub fn emoji(&self) -> &'static str {
        match self {
            Reaction::InProgress => "⏳",
            Reaction::Success => "✅",
            Reaction::Error => "❌",
        }
    }
}

/// Per-message feedback surface: reactions plus a threaded reply.
#[async_trait]
pub trait FeedbackChannel: Send + Sync {
    async fn react(&self, reaction: Reaction) -> Result<()>;

    /// Remove this bot's own reaction. Removing an absent reaction is not an error.
    async fn unreact(&self, reaction: Reaction) -> Result<()>;

    async fn reply(&self, text: &str) -> Result<()>;
}
