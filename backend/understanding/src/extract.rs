//! Field extractor: recognized odometer-photo text → date, time, and location.
//!
//! Camera overlays burn date/time stamps into the picture, so the heuristics are
//! line-oriented and conservative: anything that looks like a date, a time, or a
//! reading is kept out of the location text. Extraction never fails; fields that
//! do not match are left unset for the caller to default.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fields recovered from recognized text. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ExtractedFields {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.time.is_none() && self.location.is_none()
    }
}

/// Maximum number of candidate lines joined into the location.
const LOCATION_LINES: usize = 2;

// --- Compiled regexes ---

static NUMERIC_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}").unwrap());

static MONTH_NAME_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d{1,2}\s+(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{2,4}")
        .unwrap()
});

/// Day followed by a month name, year not required. Only used to reject location lines.
static MONTH_NAME_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d{1,2}\s+(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)").unwrap()
});

static TIME_HINT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{1,2}:\d{2}").unwrap());

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}:\d{2}(?::\d{2})?(?:\s*[APap][Mm])?").unwrap());

static LEADING_READING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}").unwrap());

static ALPHA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]").unwrap());

/// Extract date, time, and location candidates from recognized text.
pub fn extract_fields(recognized_text: &str) -> ExtractedFields {
    let lines = split_lines(recognized_text);
    let mut fields = ExtractedFields::default();

    for line in &lines {
        if fields.date.is_none() {
            fields.date = match_date(line);
        }
        if fields.time.is_none() && TIME_HINT_RE.is_match(line) {
            fields.time = TIME_RE.find(line).map(|m| m.as_str().to_string());
        }
        if fields.date.is_some() && fields.time.is_some() {
            break;
        }
    }

    let candidates: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| is_location_candidate(line))
        .take(LOCATION_LINES)
        .collect();
    if !candidates.is_empty() {
        fields.location = Some(candidates.join(", "));
    }

    fields
}

/// Non-empty trimmed lines, in order.
fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Numeric stamps are the dominant overlay format, so they win over month names on the same line.
fn match_date(line: &str) -> Option<String> {
    NUMERIC_DATE_RE
        .find(line)
        .or_else(|| MONTH_NAME_DATE_RE.find(line))
        .map(|m| m.as_str().to_string())
}

fn is_location_candidate(line: &str) -> bool {
    !NUMERIC_DATE_RE.is_match(line)
        && !MONTH_NAME_PREFIX_RE.is_match(line)
        && !LEADING_READING_RE.is_match(line)
        && !TIME_HINT_RE.is_match(line)
        && line.chars().count() >= 3
        && ALPHA_RE.is_match(line)
}
