//! Log Redaction Layer
//!
//! Scrubs chat bot tokens and OAuth access tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static DISCORD_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[MNO][A-Za-z\d_-]{23,27}\.[A-Za-z\d_-]{6}\.[A-Za-z\d_-]{27,40}").unwrap()
});
static GOOGLE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ya29\.[A-Za-z0-9\-_]+").unwrap());
static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let mut redacted = BEARER_RE.replace_all(input, "Bearer [REDACTED_TOKEN]").to_string();
    redacted = GOOGLE_TOKEN_RE.replace_all(&redacted, "[REDACTED_TOKEN]").to_string();
    redacted = DISCORD_TOKEN_RE.replace_all(&redacted, "[REDACTED_TOKEN]").to_string();
    redacted
}
