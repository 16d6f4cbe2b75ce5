//! Ledger writer: header bootstrap, same-date delta, and append.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use odolog_core::{Difference, LedgerBackend, LedgerRow, OdoError, OdoResult, OdometerEvent};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};

use crate::delta::compute_delta;
use crate::range::LedgerRanges;

/// Default upper bound on a single backend call.
pub const DEFAULT_LEDGER_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-date async locks.
///
/// Held across "read history → compute delta → append" so two submissions for
/// the same date chain their deltas instead of both diffing against one row.
#[derive(Default)]
pub struct DateLocks {
    locks: std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DateLocks {
    pub async fn lock(&self, date: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // Drop locks nobody holds or waits on.
            locks.retain(|_, l| Arc::strong_count(l) > 1);
            locks.entry(date.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of dates with a live lock.
    pub fn active(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.values().filter(|l| Arc::strong_count(l) > 1).count()
    }
}

pub struct LedgerWriter {
    backend: Arc<dyn LedgerBackend>,
    ranges: LedgerRanges,
    timeout: Duration,
    date_locks: DateLocks,
}

impl LedgerWriter {
    pub fn new(backend: Arc<dyn LedgerBackend>, ranges: LedgerRanges) -> Self {
        Self {
            backend,
            ranges,
            timeout: DEFAULT_LEDGER_TIMEOUT,
            date_locks: DateLocks::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn ranges(&self) -> &LedgerRanges {
        &self.ranges
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    async fn bounded<T>(&self, op: &str, fut: impl Future<Output = OdoResult<T>>) -> OdoResult<T> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| OdoError::ledger(format!("{op} timed out after {:?}", self.timeout)))?
    }

    /// Write the canonical header when the header row is empty or unreadable.
    pub async fn ensure_schema(&self) -> OdoResult<()> {
        let header = &self.ranges.header;
        match self.bounded("header read", self.backend.read_range(header)).await {
            Ok(rows) if rows.first().is_some_and(|r| r.iter().any(|c| !c.is_empty())) => {
                return Ok(());
            }
            Ok(_) => info!(range = %header, "Ledger header missing; creating it"),
            Err(e) => {
                warn!(range = %header, error = %e, "Could not read ledger header; rewriting it")
            }
        }
        self.bounded(
            "header write",
            self.backend
                .write_range(header, vec![LedgerRow::header_cells()]),
        )
        .await
    }

    /// Every ledger row, header first.
    pub async fn read_rows(&self) -> OdoResult<Vec<LedgerRow>> {
        let raw = self
            .bounded("ledger read", self.backend.read_range(&self.ranges.data))
            .await?;
        Ok(raw.iter().map(|cells| LedgerRow::from_cells(cells)).collect())
    }

    /// Append one row. The backend assigns its position.
    pub async fn append_row(&self, row: &LedgerRow) -> OdoResult<()> {
        self.bounded(
            "ledger append",
            self.backend
                .append_rows(&self.ranges.data, vec![row.to_cells()]),
        )
        .await
    }

    /// Ensure the header, compute the same-date delta, and append the event.
    pub async fn record(&self, event: &OdometerEvent) -> OdoResult<Difference> {
        let _guard = self.date_locks.lock(&event.date).await;

        self.ensure_schema().await?;
        let history = self.read_rows().await?;
        let difference = compute_delta(&history, &event.date, &event.odometer_reading);
        match difference {
            Difference::Km(km) => {
                info!(date = %event.date, km, "Difference from previous same-date reading")
            }
            Difference::Unavailable => {
                info!(date = %event.date, "No previous reading on this date")
            }
        }

        let row = LedgerRow::from_event(event, difference);
        self.append_row(&row).await?;
        info!(backend = self.backend.name(), row = ?row.to_cells(), "Ledger row appended");
        Ok(difference)
    }
}
