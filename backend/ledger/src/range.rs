//! A1-notation ranges: `Sheet!A1:F1`, `Sheet!A:F`, `'Sheet Name'!B2:D`.

use std::fmt;

use odolog_core::{OdoError, OdoResult};

/// Default sheet holding the mileage ledger.
pub const DEFAULT_SHEET_NAME: &str = "Drivers_Mileage";

/// Number of ledger columns (A through F).
pub const LEDGER_COLUMNS: u32 = 6;

/// A parsed rectangular range. Rows and columns are 1-based and inclusive;
/// an absent row bound means "unbounded" on that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    pub sheet: String,
    pub start_col: u32,
    pub end_col: u32,
    pub start_row: Option<u32>,
    pub end_row: Option<u32>,
}

impl SheetRange {
    pub fn parse(range: &str) -> OdoResult<Self> {
        let (sheet, cells) = range
            .rsplit_once('!')
            .ok_or_else(|| invalid(range, "missing sheet name"))?;
        let sheet = unquote_sheet_name(sheet);
        if sheet.is_empty() {
            return Err(invalid(range, "empty sheet name"));
        }

        let (start, end) = cells.split_once(':').unwrap_or((cells, cells));
        let (start_col, start_row) = parse_cell(start).ok_or_else(|| invalid(range, start))?;
        let (end_col, end_row) = parse_cell(end).ok_or_else(|| invalid(range, end))?;
        if end_col < start_col {
            return Err(invalid(range, "columns out of order"));
        }
        if let (Some(s), Some(e)) = (start_row, end_row) {
            if e < s {
                return Err(invalid(range, "rows out of order"));
            }
        }

        Ok(Self {
            sheet,
            start_col,
            end_col,
            start_row,
            end_row,
        })
    }

    /// Zero-based column offsets covered by the range.
    pub fn column_span(&self) -> std::ops::Range<usize> {
        (self.start_col as usize - 1)..(self.end_col as usize)
    }

    /// First row of the range, defaulting to 1.
    pub fn first_row(&self) -> u32 {
        self.start_row.unwrap_or(1)
    }

    pub fn contains_row(&self, row: u32) -> bool {
        row >= self.first_row() && self.end_row.map(|end| row <= end).unwrap_or(true)
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", quote_sheet_name(&self.sheet), column_name(self.start_col))?;
        if let Some(row) = self.start_row {
            write!(f, "{row}")?;
        }
        write!(f, ":{}", column_name(self.end_col))?;
        if let Some(row) = self.end_row {
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

/// The two ranges the ledger writer touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRanges {
    /// Header row only: `Sheet!A1:F1`.
    pub header: String,
    /// Every row, header included: `Sheet!A:F`.
    pub data: String,
}

impl LedgerRanges {
    pub fn for_sheet(sheet: &str) -> Self {
        let sheet = quote_sheet_name(sheet);
        let last = column_name(LEDGER_COLUMNS);
        Self {
            header: format!("{sheet}!A1:{last}1"),
            data: format!("{sheet}!A:{last}"),
        }
    }
}

impl Default for LedgerRanges {
    fn default() -> Self {
        Self::for_sheet(DEFAULT_SHEET_NAME)
    }
}

fn invalid(range: &str, detail: &str) -> OdoError {
    OdoError::ledger(format!("invalid range '{range}': {detail}"))
}

/// Sheet names containing anything but `[A-Za-z0-9_]` must be single-quoted.
pub fn quote_sheet_name(sheet: &str) -> String {
    if sheet.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        sheet.to_string()
    } else {
        format!("'{}'", sheet.replace('\'', "''"))
    }
}

fn unquote_sheet_name(sheet: &str) -> String {
    match sheet.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        Some(inner) => inner.replace("''", "'"),
        None => sheet.to_string(),
    }
}

/// `"B12"` → `(2, Some(12))`, `"F"` → `(6, None)`.
fn parse_cell(cell: &str) -> Option<(u32, Option<u32>)> {
    let split = cell.find(|c: char| c.is_ascii_digit()).unwrap_or(cell.len());
    let (letters, digits) = cell.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let col = letters
        .chars()
        .try_fold(0u32, |acc, c| {
            acc.checked_mul(26)?
                .checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)
        })?;
    let row = if digits.is_empty() {
        None
    } else {
        match digits.parse::<u32>() {
            Ok(0) | Err(_) => return None,
            Ok(row) => Some(row),
        }
    };
    Some((col, row))
}

/// 1 → `A`, 27 → `AA`.
pub fn column_name(mut col: u32) -> String {
    let mut name = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        name.push((b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    name.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_range() {
        let r = SheetRange::parse("Drivers_Mileage!A1:F1").unwrap();
        assert_eq!(r.sheet, "Drivers_Mileage");
        assert_eq!((r.start_col, r.end_col), (1, 6));
        assert_eq!((r.start_row, r.end_row), (Some(1), Some(1)));
        assert_eq!(r.column_span(), 0..6);
    }

    #[test]
    fn parses_open_column_range() {
        let r = SheetRange::parse("Drivers_Mileage!A:F").unwrap();
        assert_eq!((r.start_row, r.end_row), (None, None));
        assert!(r.contains_row(1));
        assert!(r.contains_row(10_000));
    }

    #[test]
    fn quoted_sheet_names_round_trip() {
        let ranges = LedgerRanges::for_sheet("Van Fleet");
        assert_eq!(ranges.header, "'Van Fleet'!A1:F1");
        let r = SheetRange::parse(&ranges.data).unwrap();
        assert_eq!(r.sheet, "Van Fleet");
        assert_eq!(r.to_string(), "'Van Fleet'!A:F");
    }

    #[test]
    fn default_ranges_match_ledger_layout() {
        let ranges = LedgerRanges::default();
        assert_eq!(ranges.header, "Drivers_Mileage!A1:F1");
        assert_eq!(ranges.data, "Drivers_Mileage!A:F");
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(SheetRange::parse("A1:F1").is_err());
        assert!(SheetRange::parse("Sheet!1:2").is_err());
        assert!(SheetRange::parse("Sheet!F1:A1").is_err());
        assert!(SheetRange::parse("Sheet!A0:F1").is_err());
    }

    #[test]
    fn column_names() {
        assert_eq!(column_name(1), "A");
        assert_eq!(column_name(6), "F");
        assert_eq!(column_name(27), "AA");
    }
}
