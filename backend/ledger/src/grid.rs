//! Range semantics over an in-memory cell grid, shared by the local backends.
//!
//! Behaves like the Sheets values API does: reads drop trailing empty cells and
//! rows, writes overwrite in place, appends land after the last non-empty row.

use crate::range::SheetRange;

/// Rows of cells, row 1 at index 0.
pub type Grid = Vec<Vec<String>>;

pub fn read(grid: &Grid, range: &SheetRange) -> Vec<Vec<String>> {
    let span = range.column_span();
    let mut out: Vec<Vec<String>> = grid
        .iter()
        .enumerate()
        .filter(|(i, _)| range.contains_row(*i as u32 + 1))
        .map(|(_, row)| {
            let mut cells: Vec<String> = row
                .iter()
                .skip(span.start)
                .take(span.len())
                .cloned()
                .collect();
            while cells.last().is_some_and(|c| c.is_empty()) {
                cells.pop();
            }
            cells
        })
        .collect();
    while out.last().is_some_and(|r| r.is_empty()) {
        out.pop();
    }
    out
}

/// Overwrite cells starting at the range's first row. Returns the touched row numbers.
pub fn write(grid: &mut Grid, range: &SheetRange, rows: &[Vec<String>]) -> Vec<u32> {
    let first = range.first_row();
    place(grid, range, first, rows)
}

/// Append after the last non-empty row. Returns the touched row numbers.
pub fn append(grid: &mut Grid, range: &SheetRange, rows: &[Vec<String>]) -> Vec<u32> {
    let span = range.column_span();
    let last_used = grid
        .iter()
        .rposition(|row| {
            row.iter()
                .skip(span.start)
                .take(span.len())
                .any(|c| !c.is_empty())
        })
        .map(|i| i as u32 + 1)
        .unwrap_or(0);
    let first = last_used.max(range.first_row() - 1) + 1;
    place(grid, range, first, rows)
}

fn place(grid: &mut Grid, range: &SheetRange, first_row: u32, rows: &[Vec<String>]) -> Vec<u32> {
    let start_col = range.column_span().start;
    let mut touched = Vec::with_capacity(rows.len());
    for (k, cells) in rows.iter().enumerate() {
        let row_number = first_row + k as u32;
        let idx = row_number as usize - 1;
        if grid.len() <= idx {
            grid.resize_with(idx + 1, Vec::new);
        }
        let row = &mut grid[idx];
        if row.len() < start_col + cells.len() {
            row.resize(start_col + cells.len(), String::new());
        }
        for (j, cell) in cells.iter().enumerate() {
            row[start_col + j] = cell.clone();
        }
        touched.push(row_number);
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn range(r: &str) -> SheetRange {
        SheetRange::parse(r).unwrap()
    }

    #[test]
    fn append_to_empty_grid_starts_at_row_one() {
        let mut grid = Grid::new();
        let touched = append(&mut grid, &range("S!A:F"), &[cells(&["a", "b"])]);
        assert_eq!(touched, vec![1]);
        assert_eq!(read(&grid, &range("S!A:F")), vec![cells(&["a", "b"])]);
    }

    #[test]
    fn write_then_append_keeps_header_first() {
        let mut grid = Grid::new();
        write(&mut grid, &range("S!A1:F1"), &[cells(&["Date", "Time"])]);
        append(&mut grid, &range("S!A:F"), &[cells(&["16/10/2026", "9:00"])]);
        let all = read(&grid, &range("S!A:F"));
        assert_eq!(all[0][0], "Date");
        assert_eq!(all[1][0], "16/10/2026");
    }

    #[test]
    fn header_range_reads_only_first_row() {
        let mut grid = Grid::new();
        append(&mut grid, &range("S!A:F"), &[cells(&["h"]), cells(&["r1"])]);
        assert_eq!(read(&grid, &range("S!A1:F1")), vec![cells(&["h"])]);
    }

    #[test]
    fn reads_drop_trailing_empties() {
        let grid: Grid = vec![cells(&["a", "", ""]), cells(&["", ""])];
        assert_eq!(read(&grid, &range("S!A:F")), vec![cells(&["a"])]);
    }

    #[test]
    fn write_overwrites_in_place() {
        let mut grid: Grid = vec![cells(&["old", "x"])];
        write(&mut grid, &range("S!A1:F1"), &[cells(&["new"])]);
        assert_eq!(grid[0], cells(&["new", "x"]));
    }
}
