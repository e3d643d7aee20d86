//! Connection settings for the Google Sheets backend.
//!
//! Everything comes from environment variables so credentials never land in a
//! checked-in file:
//!
//! - `GOOGLE_SERVICE_ACCOUNT_EMAIL` (required)
//! - `GOOGLE_SERVICE_ACCOUNT_KEY` (required, PEM; literal `\n` sequences are
//!   turned into line breaks)
//! - `GOOGLE_SHEETS_ID` (required)
//! - `GOOGLE_SHEETS_TAB` (optional, default `Sheet1`)

use std::fmt;

pub const ENV_CLIENT_EMAIL: &str = "GOOGLE_SERVICE_ACCOUNT_EMAIL";
pub const ENV_PRIVATE_KEY: &str = "GOOGLE_SERVICE_ACCOUNT_KEY";
pub const ENV_SPREADSHEET_ID: &str = "GOOGLE_SHEETS_ID";
pub const ENV_TAB: &str = "GOOGLE_SHEETS_TAB";

/// Tab used when none is configured.
pub const DEFAULT_TAB: &str = "Sheet1";

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Errors raised while assembling a [`SheetsConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SheetsConfigError {
    #[error("Missing environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),
}

/// Service-account credentials plus the spreadsheet to talk to.
#[derive(Clone)]
pub struct SheetsConfig {
    pub client_email: String,
    pub private_key: String,
    pub spreadsheet_id: String,
    pub tab: String,
    pub api_base: String,
    pub token_uri: String,
}

impl fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("tab", &self.tab)
            .field("api_base", &self.api_base)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl SheetsConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, SheetsConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as missing. All missing required keys are reported
    /// together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SheetsConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_email = get(ENV_CLIENT_EMAIL);
        let private_key = get(ENV_PRIVATE_KEY);
        let spreadsheet_id = get(ENV_SPREADSHEET_ID);

        let missing: Vec<String> = [
            (ENV_CLIENT_EMAIL, client_email.is_none()),
            (ENV_PRIVATE_KEY, private_key.is_none()),
            (ENV_SPREADSHEET_ID, spreadsheet_id.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(key, _)| key.to_string())
        .collect();

        match (client_email, private_key, spreadsheet_id) {
            (Some(client_email), Some(private_key), Some(spreadsheet_id)) => Ok(Self {
                client_email,
                private_key: normalize_private_key(&private_key),
                spreadsheet_id,
                tab: get(ENV_TAB).unwrap_or_else(|| DEFAULT_TAB.to_string()),
                api_base: DEFAULT_API_BASE.to_string(),
                token_uri: DEFAULT_TOKEN_URI.to_string(),
            }),
            _ => Err(SheetsConfigError::Missing(missing)),
        }
    }
}

/// Keys pasted into single-line env files carry `\n` as two characters.
pub fn normalize_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}
