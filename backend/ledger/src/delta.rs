//! Same-date odometer delta.
//!
//! Differences are only computed against a reading from the same calendar date
//! (exact match on the stored date text); cross-date deltas are never produced.

use odolog_core::event::parse_odometer;
use odolog_core::{Difference, LedgerRow};

/// Lookup of the most recent odometer value recorded on a date.
///
/// The linear scan below reads the whole history; a per-date index can
/// implement this trait and be passed to [`delta_against`] instead.
pub trait PredecessorIndex {
    fn latest_on(&self, date: &str) -> Option<u64>;
}

/// Newest-to-oldest scan over ledger rows. Row 0 is the header and is skipped.
pub struct LinearScan<'a> {
    rows: &'a [LedgerRow],
}

impl<'a> LinearScan<'a> {
    pub fn new(rows: &'a [LedgerRow]) -> Self {
        Self { rows }
    }
}

impl PredecessorIndex for LinearScan<'_> {
    fn latest_on(&self, date: &str) -> Option<u64> {
        self.rows
            .iter()
            .skip(1)
            .rev()
            .filter(|row| row.date == date)
            .find_map(|row| row.odometer_value())
    }
}

/// Delta between `new_odometer` and the latest same-date row in `rows` (header first).
pub fn compute_delta(rows: &[LedgerRow], new_date: &str, new_odometer: &str) -> Difference {
    delta_against(&LinearScan::new(rows), new_date, new_odometer)
}

/// Delta against any predecessor index. Negative results are returned unclamped.
pub fn delta_against(
    index: &impl PredecessorIndex,
    new_date: &str,
    new_odometer: &str,
) -> Difference {
    let Some(previous) = index.latest_on(new_date) else {
        return Difference::Unavailable;
    };
    let Some(current) = parse_odometer(new_odometer) else {
        return Difference::Unavailable;
    };
    match (i64::try_from(current), i64::try_from(previous)) {
        (Ok(current), Ok(previous)) => Difference::Km(current - previous),
        _ => Difference::Unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn header() -> LedgerRow {
        LedgerRow::from_cells(&LedgerRow::header_cells())
    }

    fn row(date: &str, odometer: &str) -> LedgerRow {
        LedgerRow {
            date: date.into(),
            time: "9:00:00 AM".into(),
            location: "N/A".into(),
            odometer_reading: odometer.into(),
            difference: "N/A".into(),
            driver: "alice".into(),
        }
    }

    #[test]
    fn most_recent_same_date_row_wins() {
        let rows = vec![
            header(),
            row("01/05/2026", "100"),
            row("01/05/2026", "150"),
            row("02/05/2026", "10"),
        ];
        assert_eq!(compute_delta(&rows, "01/05/2026", "180"), Difference::Km(30));
    }

    #[test]
    fn unknown_date_is_unavailable() {
        let rows = vec![header(), row("01/05/2026", "100"), row("02/05/2026", "10")];
        assert_eq!(
            compute_delta(&rows, "03/05/2026", "180"),
            Difference::Unavailable
        );
    }

    #[test]
    fn header_only_or_empty_is_unavailable() {
        assert_eq!(compute_delta(&[], "01/05/2026", "180"), Difference::Unavailable);
        assert_eq!(
            compute_delta(&[header()], "01/05/2026", "180"),
            Difference::Unavailable
        );
    }

    #[test]
    fn strips_decoration_before_arithmetic() {
        let rows = vec![header(), row("16/10/2026", "149,684 km")];
        assert_eq!(
            compute_delta(&rows, "16/10/2026", "149,700 km"),
            Difference::Km(16)
        );
    }

    #[test]
    fn negative_delta_is_kept() {
        let rows = vec![header(), row("16/10/2026", "150000")];
        assert_eq!(
            compute_delta(&rows, "16/10/2026", "149990"),
            Difference::Km(-10)
        );
    }

    #[test]
    fn rows_without_digits_are_skipped() {
        let rows = vec![
            header(),
            row("16/10/2026", "120000"),
            row("16/10/2026", "N/A"),
            row("16/10/2026", ""),
        ];
        assert_eq!(
            compute_delta(&rows, "16/10/2026", "120050"),
            Difference::Km(50)
        );
    }

    #[test]
    fn header_row_is_never_a_predecessor() {
        let mut fake_header = row("16/10/2026", "99999");
        fake_header.driver = "Driver".into();
        let rows = vec![fake_header];
        assert_eq!(
            compute_delta(&rows, "16/10/2026", "100000"),
            Difference::Unavailable
        );
    }

    #[test]
    fn date_match_is_exact_text() {
        let rows = vec![header(), row("1/5/2026", "100")];
        assert_eq!(
            compute_delta(&rows, "01/05/2026", "180"),
            Difference::Unavailable
        );
    }

    struct LastSeen(HashMap<String, u64>);

    impl PredecessorIndex for LastSeen {
        fn latest_on(&self, date: &str) -> Option<u64> {
            self.0.get(date).copied()
        }
    }

    #[test]
    fn index_can_replace_linear_scan() {
        let index = LastSeen(HashMap::from([("16/10/2026".to_string(), 1_000)]));
        assert_eq!(
            delta_against(&index, "16/10/2026", "1250"),
            Difference::Km(250)
        );
        assert_eq!(
            delta_against(&index, "17/10/2026", "1250"),
            Difference::Unavailable
        );
    }
}
