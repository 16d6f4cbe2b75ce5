use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel written to the ledger for values that could not be determined.
pub const NOT_AVAILABLE: &str = "N/A";

/// Canonical ledger column names, in storage order.
pub const LEDGER_HEADER: [&str; 6] = [
    "Date",
    "Time",
    "Location",
    "Odometer Reading",
    "Difference",
    "Driver",
];

/// A single mileage report, assembled from the command text and an optional photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OdometerEvent {
    pub date: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub odometer_reading: String,
    pub driver: String,
}

impl OdometerEvent {
    /// Date, time, reading, and driver are all present. Location is optional.
    pub fn is_complete(&self) -> bool {
        !self.date.is_empty()
            && !self.time.is_empty()
            && !self.odometer_reading.is_empty()
            && !self.driver.is_empty()
    }
}

/// Distance since the most recent same-date reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difference {
    /// Signed kilometres. Negative values are kept as-is (rollback or entry reversal).
    Km(i64),
    /// No same-date predecessor exists.
    Unavailable,
}

impl Difference {
    pub fn km(&self) -> Option<i64> {
        match self {
            Difference::Km(km) => Some(*km),
            Difference::Unavailable => None,
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::Km(km) => write!(f, "{}", km),
            Difference::Unavailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// One persisted ledger record: `[date, time, location, odometer, difference, driver]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRow {
    pub date: String,
    pub time: String,
    pub location: String,
    pub odometer_reading: String,
    pub difference: String,
    pub driver: String,
}

impl LedgerRow {
    pub fn from_event(event: &OdometerEvent, difference: Difference) -> Self {
        Self {
            date: or_not_available(&event.date),
            time: or_not_available(&event.time),
            location: event
                .location
                .as_deref()
                .map(or_not_available)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            odometer_reading: or_not_available(&event.odometer_reading),
            difference: difference.to_string(),
            driver: if event.driver.is_empty() {
                "Unknown".to_string()
            } else {
                event.driver.clone()
            },
        }
    }

    /// Build a row from raw backend cells. Short rows are padded with empty cells.
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        Self {
            date: cell(0),
            time: cell(1),
            location: cell(2),
            odometer_reading: cell(3),
            difference: cell(4),
            driver: cell(5),
        }
    }

    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.time.clone(),
            self.location.clone(),
            self.odometer_reading.clone(),
            self.difference.clone(),
            self.driver.clone(),
        ]
    }

    pub fn header_cells() -> Vec<String> {
        LEDGER_HEADER.iter().map(|s| s.to_string()).collect()
    }

    pub fn odometer_value(&self) -> Option<u64> {
        parse_odometer(&self.odometer_reading)
    }
}

fn or_not_available(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

/// Drop every non-digit character: `"149,684 km"` becomes `"149684"`.
pub fn strip_non_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Digits-only numeric value of an odometer field, `None` when no digits remain.
pub fn parse_odometer(value: &str) -> Option<u64> {
    let digits = strip_non_digits(value);
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
