pub mod clock;
pub mod dedup;
pub mod error;
pub mod event;
pub mod message;
pub mod traits;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dedup::{ProcessedMessageSet, DEFAULT_DEDUP_CAPACITY};
pub use error::{OdoError, OdoResult};
pub use event::{Difference, LedgerRow, OdometerEvent, LEDGER_HEADER, NOT_AVAILABLE};
pub use message::{Attachment, IncomingMessage};
pub use traits::{FeedbackChannel, LedgerBackend, OcrEngine, Reaction};
