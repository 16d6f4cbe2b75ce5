//! SQLite-backed ledger for running without a spreadsheet.
//!
//! Each sheet row is stored as a JSON array of cells keyed by `(sheet, row_number)`.
//! Range semantics are the same as the in-memory backend.

use std::fmt::Display;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use odolog_core::{LedgerBackend, OdoError, OdoResult};
use rusqlite::{params, Connection};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::grid::{self, Grid};
use crate::range::SheetRange;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS ledger_rows (
    sheet       TEXT    NOT NULL,
    row_number  INTEGER NOT NULL,
    cells       TEXT    NOT NULL,
    PRIMARY KEY (sheet, row_number)
);";

pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    /// Create or open a ledger database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("Failed to open ledger database {:?}", path.as_ref()))?;
        conn.execute_batch(&format!("PRAGMA journal_mode=WAL;\n{SCHEMA}"))
            .context("Failed to initialize ledger schema")?;
        info!("SqliteLedger opened at {:?}", path.as_ref());
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory database (for tests).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

fn db_err(e: impl Display) -> OdoError {
    OdoError::ledger(format!("sqlite: {e}"))
}

fn load_grid(conn: &Connection, sheet: &str) -> OdoResult<Grid> {
    let mut stmt = conn
        .prepare(
            "SELECT row_number, cells FROM ledger_rows WHERE sheet = ?1 ORDER BY row_number ASC",
        )
        .map_err(db_err)?;
    let rows = stmt
        .query_map(params![sheet], |row| {
            let number: i64 = row.get(0)?;
            let cells: String = row.get(1)?;
            Ok((number, cells))
        })
        .map_err(db_err)?;

    let mut grid = Grid::new();
    for row in rows {
        let (number, cells) = row.map_err(db_err)?;
        let cells: Vec<String> = serde_json::from_str(&cells).map_err(db_err)?;
        let idx = usize::try_from(number - 1).map_err(db_err)?;
        if grid.len() <= idx {
            grid.resize_with(idx + 1, Vec::new);
        }
        grid[idx] = cells;
    }
    Ok(grid)
}

fn persist(conn: &mut Connection, sheet: &str, grid: &Grid, touched: &[u32]) -> OdoResult<()> {
    let tx = conn.transaction().map_err(db_err)?;
    for &number in touched {
        let cells = serde_json::to_string(&grid[number as usize - 1]).map_err(db_err)?;
        tx.execute(
            "INSERT OR REPLACE INTO ledger_rows (sheet, row_number, cells) VALUES (?1, ?2, ?3)",
            params![sheet, number, cells],
        )
        .map_err(db_err)?;
    }
    tx.commit().map_err(db_err)
}

#[async_trait]
impl LedgerBackend for SqliteLedger {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn read_range(&self, range: &str) -> OdoResult<Vec<Vec<String>>> {
        let parsed = SheetRange::parse(range)?;
        let conn = self.conn.lock().await;
        let grid = load_grid(&conn, &parsed.sheet)?;
        Ok(grid::read(&grid, &parsed))
    }

    async fn write_range(&self, range: &str, rows: Vec<Vec<String>>) -> OdoResult<()> {
        let parsed = SheetRange::parse(range)?;
        let mut conn = self.conn.lock().await;
        let mut grid = load_grid(&conn, &parsed.sheet)?;
        let touched = grid::write(&mut grid, &parsed, &rows);
        persist(&mut conn, &parsed.sheet, &grid, &touched)?;
        debug!(range = %range, rows = ?touched, "Sqlite ledger write");
        Ok(())
    }

    async fn append_rows(&self, range: &str, rows: Vec<Vec<String>>) -> OdoResult<()> {
        let parsed = SheetRange::parse(range)?;
        let mut conn = self.conn.lock().await;
        let mut grid = load_grid(&conn, &parsed.sheet)?;
        let touched = grid::append(&mut grid, &parsed, &rows);
        persist(&mut conn, &parsed.sheet, &grid, &touched)?;
        debug!(range = %range, rows = ?touched, "Sqlite ledger append");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn header_then_rows_persist_in_order() {
        let ledger = SqliteLedger::in_memory().unwrap();
        ledger
            .write_range("Drivers_Mileage!A1:F1", vec![cells(&["Date", "Time"])])
            .await
            .unwrap();
        ledger
            .append_rows("Drivers_Mileage!A:F", vec![cells(&["16/10/2026", "9:00"])])
            .await
            .unwrap();
        ledger
            .append_rows("Drivers_Mileage!A:F", vec![cells(&["16/10/2026", "10:00"])])
            .await
            .unwrap();

        let rows = ledger.read_range("Drivers_Mileage!A:F").await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "Date");
        assert_eq!(rows[2][1], "10:00");
    }

    #[tokio::test]
    async fn sheets_are_isolated() {
        let ledger = SqliteLedger::in_memory().unwrap();
        ledger.append_rows("A!A:F", vec![cells(&["x"])]).await.unwrap();
        assert!(ledger.read_range("B!A:F").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        {
            let ledger = SqliteLedger::open(&path).unwrap();
            ledger.append_rows("S!A:F", vec![cells(&["kept"])]).await.unwrap();
        }
        let ledger = SqliteLedger::open(&path).unwrap();
        assert_eq!(ledger.read_range("S!A:F").await.unwrap(), vec![cells(&["kept"])]);
    }
}
