//! Google Sheets ledger backend.
//!
//! Talks to the Sheets v4 `spreadsheets.values` REST API with a bearer access
//! token. Obtaining and refreshing that token is left to the deployment.
//!
//! ```text
//! GET  /v4/spreadsheets/{id}/values/{range}
//! PUT  /v4/spreadsheets/{id}/values/{range}?valueInputOption=RAW
//! POST /v4/spreadsheets/{id}/values/{range}:append?valueInputOption=USER_ENTERED
//! ```

use async_trait::async_trait;
use odolog_core::{LedgerBackend, OdoError, OdoResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

#[derive(Clone)]
pub struct GoogleSheetsLedger {
    http: Client,
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Vec<String>>,
}

impl GoogleSheetsLedger {
    pub fn new(spreadsheet_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: SHEETS_API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
        }
    }

    /// Point at a different API host (proxies, emulators).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn values_url(&self, range: &str, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}{}",
            self.base_url,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(range),
            suffix
        )
    }

    async fn check(resp: reqwest::Response, op: &str) -> OdoResult<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Err(OdoError::ledger(format!("Sheets {op} failed ({status}): {body}")))
    }
}

fn transport(op: &str, e: reqwest::Error) -> OdoError {
    OdoError::ledger(format!("Sheets {op} request failed: {e}"))
}

/// Cells come back as strings with the default render option; stringify anything else.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl LedgerBackend for GoogleSheetsLedger {
    fn name(&self) -> &str {
        "google-sheets"
    }

    async fn read_range(&self, range: &str) -> OdoResult<Vec<Vec<String>>> {
        let resp = self
            .http
            .get(self.values_url(range, ""))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| transport("read", e))?;
        let resp = Self::check(resp, "read").await?;
        let body: ValueRange = resp.json().await.map_err(|e| transport("read", e))?;
        debug!(range = %range, rows = body.values.len(), "Read sheet range");
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn write_range(&self, range: &str, rows: Vec<Vec<String>>) -> OdoResult<()> {
        let body = ValueRangeBody {
            range,
            major_dimension: "ROWS",
            values: rows,
        };
        let resp = self
            .http
            .put(self.values_url(range, "?valueInputOption=RAW"))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport("write", e))?;
        Self::check(resp, "write").await?;
        info!(range = %range, "Wrote sheet range");
        Ok(())
    }

    async fn append_rows(&self, range: &str, rows: Vec<Vec<String>>) -> OdoResult<()> {
        let count = rows.len();
        let body = ValueRangeBody {
            range,
            major_dimension: "ROWS",
            values: rows,
        };
        let resp = self
            .http
            .post(self.values_url(
                range,
                ":append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
            ))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport("append", e))?;
        Self::check(resp, "append").await?;
        info!(range = %range, rows = count, "Appended to sheet");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_range_and_id_in_url() {
        let ledger = GoogleSheetsLedger::new("sheet id", "token")
            .with_base_url("http://localhost:9000/");
        assert_eq!(
            ledger.values_url("'Van Fleet'!A:F", ":append"),
            "http://localhost:9000/v4/spreadsheets/sheet%20id/values/%27Van%20Fleet%27%21A%3AF:append"
        );
    }

    #[test]
    fn parses_value_ranges_with_missing_values() {
        let body: ValueRange =
            serde_json::from_str(r#"{"range":"S!A1:F1","majorDimension":"ROWS"}"#).unwrap();
        assert!(body.values.is_empty());
    }

    #[test]
    fn non_string_cells_are_stringified() {
        assert_eq!(cell_text(Value::from(149684)), "149684");
        assert_eq!(cell_text(Value::Null), "");
        assert_eq!(cell_text(Value::from("N/A")), "N/A");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_ledger_error() {
        let ledger = GoogleSheetsLedger::new("id", "token").with_base_url("http://127.0.0.1:1");
        let err = ledger.read_range("S!A1:F1").await.unwrap_err();
        assert!(matches!(err, OdoError::Ledger(_)));
    }
}
