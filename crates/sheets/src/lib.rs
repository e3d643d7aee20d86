//! Google Sheets backend for the commissioning submission store.

mod auth;
mod client;
mod config;
mod response;

pub use auth::{ServiceAccountAuth, MISFORMATTED_KEY_MESSAGE};
pub use client::{qualified_range, SheetsStore};
pub use config::{
    normalize_private_key, SheetsConfig, SheetsConfigError, DEFAULT_API_BASE, DEFAULT_TAB,
    DEFAULT_TOKEN_URI, ENV_CLIENT_EMAIL, ENV_PRIVATE_KEY, ENV_SPREADSHEET_ID, ENV_TAB,
};
