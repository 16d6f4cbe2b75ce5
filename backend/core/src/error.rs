use thiserror::Error;

/// Top-level error type for the odolog pipeline.
#[derive(Debug, Error)]
pub enum OdoError {
    /// Malformed command or incomplete event. Shown to the user, never logged as a fault.
    #[error("invalid command: {0}")]
    Validation(String),

    /// OCR unavailable or unreadable. Always absorbed by the caller.
    #[error("could not extract photo metadata: {0}")]
    Extraction(String),

    /// Schema bootstrap or append failure. Fatal to the current command.
    #[error("ledger error: {0}")]
    Ledger(String),

    /// Reaction or reply delivery failure. Logged only.
    #[error("feedback delivery failed: {0}")]
    Feedback(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OdoError {
    pub fn ledger(message: impl Into<String>) -> Self {
        Self::Ledger(message.into())
    }

    /// Whether this error must abort the command being processed.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, OdoError::Extraction(_) | OdoError::Feedback(_))
    }
}

pub type OdoResult<T> = Result<T, OdoError>;
