//! Decoding helpers for Sheets API responses.

use commission_storage::{Row, StorageError};
use serde::Deserialize;

/// Body of `GET .../values/{range}`. `values` is omitted for an empty range.
#[derive(Debug, Deserialize)]
pub(crate) struct ValueRange {
    #[serde(default)]
    pub(crate) values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    pub(crate) fn into_rows(self) -> Vec<Row> {
        self.values
            .iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect()
    }
}

/// Stringify one cell. Formatted reads return strings, but numbers and
/// booleans show up when the sheet is edited by hand.
pub(crate) fn cell_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Bool(true) => "TRUE".to_string(),
        serde_json::Value::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

/// Turn a non-2xx response into `StorageError::Rejected`.
pub(crate) fn rejection(response: ureq::http::Response<ureq::Body>) -> StorageError {
    let status = response.status().as_u16();
    let body = response.into_body().read_to_string().unwrap_or_default();
    StorageError::Rejected {
        status,
        message: error_message(&body),
    }
}

/// Pull a human-readable message out of a Google error body.
///
/// The values API answers `{"error": {"message": ...}}`; the token endpoint
/// answers `{"error": "invalid_grant", "error_description": ...}`.
pub(crate) fn error_message(body: &str) -> String {
    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) if body.trim().is_empty() => return "empty response body".to_string(),
        Err(_) => return body.trim().to_string(),
    };

    let error = parsed.get("error");
    if let Some(message) = error.and_then(|e| e.get("message")).and_then(|m| m.as_str()) {
        return message.to_string();
    }
    if let Some(description) = parsed.get("error_description").and_then(|d| d.as_str()) {
        return description.to_string();
    }
    if let Some(code) = error.and_then(|e| e.as_str()) {
        return code.to_string();
    }
    body.trim().to_string()
}
