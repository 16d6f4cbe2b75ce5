//! Config redaction: safe-to-share config snapshots with secrets masked.

use crate::schema::OdologConfig;
use serde_json::Value;

/// Keys whose string values are secrets.
static SECRET_KEYS: &[&str] = &[
    "botToken",
    "bot_token",
    "accessToken",
    "access_token",
    "token",
    "secret",
    "password",
];

/// Redact a config JSON value, masking all sensitive fields.
///
/// Keeps the first 4 characters as a hint so operators can tell tokens apart.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

/// Serialize and redact a typed config, ready for display.
pub fn redact_config(config: &OdologConfig) -> Value {
    redact(&serde_json::to_value(config).unwrap_or(Value::Null))
}

fn is_sensitive_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if !is_sensitive_key(key) || s.is_empty() {
        return Value::String(s.to_string());
    }
    let hint: String = s.chars().take(4).collect();
    if s.chars().count() > 8 {
        Value::String(format!("{hint}***"))
    } else {
        Value::String("***".to_string())
    }
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}
