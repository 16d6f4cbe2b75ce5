//! In-memory ledger backend, used by tests and `ledger: memory` runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use odolog_core::{LedgerBackend, OdoError, OdoResult};
use tokio::sync::Mutex;
use tracing::debug;

use crate::grid::{self, Grid};
use crate::range::SheetRange;

#[derive(Default)]
pub struct MemoryLedger {
    sheets: Mutex<HashMap<String, Grid>>,
    latency: Option<Duration>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_appends: AtomicBool,
    appends: AtomicUsize,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every operation, to widen interleaving windows in tests.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `append_rows` calls.
    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    /// Snapshot of a sheet's raw grid.
    pub async fn rows(&self, sheet: &str) -> Grid {
        self.sheets.lock().await.get(sheet).cloned().unwrap_or_default()
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn injected(op: &str) -> OdoError {
    OdoError::ledger(format!("injected {op} failure"))
}

#[async_trait]
impl LedgerBackend for MemoryLedger {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read_range(&self, range: &str) -> OdoResult<Vec<Vec<String>>> {
        let parsed = SheetRange::parse(range)?;
        self.pause().await;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }
        let sheets = self.sheets.lock().await;
        Ok(sheets
            .get(&parsed.sheet)
            .map(|g| grid::read(g, &parsed))
            .unwrap_or_default())
    }

    async fn write_range(&self, range: &str, rows: Vec<Vec<String>>) -> OdoResult<()> {
        let parsed = SheetRange::parse(range)?;
        self.pause().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected("write"));
        }
        let mut sheets = self.sheets.lock().await;
        let touched = grid::write(sheets.entry(parsed.sheet.clone()).or_default(), &parsed, &rows);
        debug!(range = %range, rows = ?touched, "Memory ledger write");
        Ok(())
    }

    async fn append_rows(&self, range: &str, rows: Vec<Vec<String>>) -> OdoResult<()> {
        let parsed = SheetRange::parse(range)?;
        self.pause().await;
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(injected("append"));
        }
        let mut sheets = self.sheets.lock().await;
        let touched = grid::append(sheets.entry(parsed.sheet.clone()).or_default(), &parsed, &rows);
        self.appends.fetch_add(1, Ordering::SeqCst);
        debug!(range = %range, rows = ?touched, "Memory ledger append");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_and_read_back() {
        let ledger = MemoryLedger::new();
        ledger
            .append_rows("Drivers_Mileage!A:F", vec![vec!["a".into(), "b".into()]])
            .await
            .unwrap();
        let rows = ledger.read_range("Drivers_Mileage!A:F").await.unwrap();
        assert_eq!(rows, vec![vec!["a".to_string(), "b".to_string()]]);
        assert_eq!(ledger.append_count(), 1);
    }

    #[tokio::test]
    async fn unknown_sheet_reads_empty() {
        let ledger = MemoryLedger::new();
        assert!(ledger.read_range("Nope!A1:F1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn injected_failures_surface_as_ledger_errors() {
        let ledger = MemoryLedger::new();
        ledger.fail_appends(true);
        let err = ledger
            .append_rows("S!A:F", vec![vec!["x".into()]])
            .await
            .unwrap_err();
        assert!(matches!(err, OdoError::Ledger(_)));
        assert_eq!(ledger.append_count(), 0);
    }
}
