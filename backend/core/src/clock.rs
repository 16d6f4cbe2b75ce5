use chrono::{Local, NaiveDateTime};

/// Source of "now" for defaulting missing date/time fields.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Day/month/year, zero padded: `16/10/2026`.
    fn date_string(&self) -> String {
        format_date(&self.now())
    }

    /// Twelve-hour clock with seconds: `3:04:05 PM`.
    fn time_string(&self) -> String {
        format_time(&self.now())
    }
}

pub fn format_date(at: &NaiveDateTime) -> String {
    at.format("%d/%m/%Y").to_string()
}

pub fn format_time(at: &NaiveDateTime) -> String {
    at.format("%-I:%M:%S %p").to_string()
}

/// Local wall-clock time of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
