//! Command detection: recognise `!odo <reading>` in inbound messages.

use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix that addresses the bot.
pub const DEFAULT_COMMAND_PREFIX: &str = "!odo";

static READING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5,7}$").unwrap());

/// What a message's text amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Not addressed to the bot.
    NotCommand,
    /// Addressed to the bot, but the argument is not a 5–7 digit reading.
    InvalidReading,
    /// A well-formed reading.
    Reading(String),
}

/// Detect the command at the start of `text`.
///
/// The prefix must be followed by whitespace or the end of the message, so
/// `!odometer` is not a command. Only the first token after the prefix counts.
pub fn detect_command(text: &str, prefix: &str) -> Detection {
    let Some(rest) = text.strip_prefix(prefix) else {
        return Detection::NotCommand;
    };
    if rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
        return Detection::NotCommand;
    }
    match rest.split_whitespace().next() {
        Some(token) if READING_RE.is_match(token) => Detection::Reading(token.to_string()),
        _ => Detection::InvalidReading,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Detection {
        detect_command(text, DEFAULT_COMMAND_PREFIX)
    }

    #[test]
    fn detects_reading() {
        assert_eq!(detect("!odo 149684"), Detection::Reading("149684".into()));
        assert_eq!(detect("!odo\t12345 after shift"), Detection::Reading("12345".into()));
        assert_eq!(detect("!odo 1234567"), Detection::Reading("1234567".into()));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert_eq!(detect("!odo"), Detection::InvalidReading);
        assert_eq!(detect("!odo   "), Detection::InvalidReading);
        assert_eq!(detect("!odo 1234"), Detection::InvalidReading);
        assert_eq!(detect("!odo 12345678"), Detection::InvalidReading);
        assert_eq!(detect("!odo 149,684"), Detection::InvalidReading);
        assert_eq!(detect("!odo km 149684"), Detection::InvalidReading);
    }

    #[test]
    fn ignores_other_messages() {
        assert_eq!(detect("hello !odo 149684"), Detection::NotCommand);
        assert_eq!(detect("!odometer 149684"), Detection::NotCommand);
        assert_eq!(detect(""), Detection::NotCommand);
    }

    #[test]
    fn custom_prefix() {
        assert_eq!(
            detect_command("/km 54321", "/km"),
            Detection::Reading("54321".into())
        );
        assert_eq!(detect_command("!odo 54321", "/km"), Detection::NotCommand);
    }
}
