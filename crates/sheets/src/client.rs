//! `TabularStore` backed by the Google Sheets v4 values API.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime. Every call fetches (or reuses) a bearer token
//! from [`ServiceAccountAuth`] first.

use std::sync::Arc;

use async_trait::async_trait;
use commission_storage::{check_row_write, CellRange, Row, StorageError, TabularStore};
use serde_json::json;
use tracing::debug;

use crate::auth::ServiceAccountAuth;
use crate::config::SheetsConfig;
use crate::response::{rejection, ValueRange};

/// Values are parsed as if typed into the UI, matching manual edits.
const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

/// Google Sheets client for a single tab of a single spreadsheet.
#[derive(Clone)]
pub struct SheetsStore {
    inner: Arc<Inner>,
}

struct Inner {
    agent: ureq::Agent,
    auth: ServiceAccountAuth,
    config: SheetsConfig,
}

impl SheetsStore {
    /// Build the client. Fails with `StorageError::Credentials` when the
    /// private key cannot be parsed.
    pub fn connect(config: SheetsConfig) -> Result<Self, StorageError> {
        let auth = ServiceAccountAuth::new(&config)?;
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Ok(Self {
            inner: Arc::new(Inner {
                agent,
                auth,
                config,
            }),
        })
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Inner) -> Result<T, StorageError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(&inner))
            .await
            .map_err(|e| StorageError::Backend(format!("task join error: {}", e)))?
    }
}

impl Inner {
    /// `{api_base}/spreadsheets/{id}/values/{range}{suffix}`. The range is
    /// percent-encoded as a single path segment, A1 punctuation included.
    fn values_url(&self, range: &str, suffix: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}{}",
            self.config.api_base.trim_end_matches('/'),
            urlencoding::encode(&self.config.spreadsheet_id),
            urlencoding::encode(range),
            suffix
        )
    }

    fn bearer(&self) -> Result<String, StorageError> {
        Ok(format!("Bearer {}", self.auth.access_token(&self.agent)?))
    }
}

#[async_trait]
impl TabularStore for SheetsStore {
    async fn read_range(&self, range: &CellRange) -> Result<Vec<Row>, StorageError> {
        let range = *range;
        self.blocking(move |inner| {
            let a1 = qualified_range(&inner.config.tab, &range.a1_notation());
            debug!(range = %a1, "reading sheet range");
            let url = inner.values_url(&a1, "");
            let response = inner
                .agent
                .get(&url)
                .header("Authorization", &inner.bearer()?)
                .call()
                .map_err(|e| StorageError::Transport(e.to_string()))?;
            if !response.status().is_success() {
                return Err(rejection(response));
            }
            let values: ValueRange = response.into_body().read_json().map_err(|e| {
                StorageError::Backend(format!("failed to parse values response: {}", e))
            })?;
            Ok(values.into_rows())
        })
        .await
    }

    async fn write_row(&self, range: &CellRange, cells: Row) -> Result<(), StorageError> {
        check_row_write(range, &cells)?;
        let range = *range;
        self.blocking(move |inner| {
            let a1 = qualified_range(&inner.config.tab, &range.a1_notation());
            debug!(range = %a1, "writing sheet row");
            let url = inner.values_url(&a1, "");
            let body = json!({ "range": a1, "values": [cells] });
            let response = inner
                .agent
                .put(&url)
                .query("valueInputOption", VALUE_INPUT_OPTION)
                .header("Authorization", &inner.bearer()?)
                .send_json(&body)
                .map_err(|e| StorageError::Transport(e.to_string()))?;
            if !response.status().is_success() {
                return Err(rejection(response));
            }
            Ok(())
        })
        .await
    }

    async fn append_row(&self, cells: Row) -> Result<(), StorageError> {
        self.blocking(move |inner| {
            let a1 = qualified_range(&inner.config.tab, "A1");
            debug!(range = %a1, "appending sheet row");
            let url = inner.values_url(&a1, ":append");
            let body = json!({ "values": [cells] });
            let response = inner
                .agent
                .post(&url)
                .query("valueInputOption", VALUE_INPUT_OPTION)
                .header("Authorization", &inner.bearer()?)
                .send_json(&body)
                .map_err(|e| StorageError::Transport(e.to_string()))?;
            if !response.status().is_success() {
                return Err(rejection(response));
            }
            Ok(())
        })
        .await
    }
}

/// Prefix an A1 range with its tab, quoting names that need it:
/// `Sheet1!A:U`, `'Field Intake'!A:U`, `'Bob''s'!A1`.
pub fn qualified_range(tab: &str, a1: &str) -> String {
    let plain = !tab.is_empty() && tab.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        format!("{tab}!{a1}")
    } else {
        format!("'{}'!{a1}", tab.replace('\'', "''"))
    }
}
