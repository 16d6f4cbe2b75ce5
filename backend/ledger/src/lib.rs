//! `odolog-ledger`: the append-only mileage ledger.
//!
//! Provides:
//! - A1-style range parsing shared by every backend
//! - Same-date delta computation behind a swappable predecessor index
//! - The ledger writer (header bootstrap + append, serialized per date)
//! - Google Sheets, SQLite, and in-memory backends

pub mod delta;
pub mod grid;
pub mod memory;
pub mod range;
pub mod sheets;
pub mod sqlite;
pub mod writer;

pub use delta::{compute_delta, delta_against, LinearScan, PredecessorIndex};
pub use memory::MemoryLedger;
pub use range::{LedgerRanges, SheetRange, DEFAULT_SHEET_NAME};
pub use sheets::GoogleSheetsLedger;
pub use sqlite::SqliteLedger;
pub use writer::{DateLocks, LedgerWriter, DEFAULT_LEDGER_TIMEOUT};
