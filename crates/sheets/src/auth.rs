//! Service-account OAuth for the Sheets API.
//!
//! A self-signed RS256 JWT assertion is exchanged at the token endpoint for a
//! short-lived bearer token. The token is cached and refreshed a minute before
//! it expires. All network calls here are blocking and must run on tokio's
//! blocking pool.

use std::sync::Mutex;

use commission_storage::StorageError;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SheetsConfig;
use crate::response::rejection;

/// OAuth scope granting read/write access to spreadsheets.
const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of a signed assertion; Google caps this at one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh the cached token this long before it expires.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Remediation shown when the PEM key cannot be parsed or used.
pub const MISFORMATTED_KEY_MESSAGE: &str = "Google service account key is misformatted. Re-save GOOGLE_SERVICE_ACCOUNT_KEY as the full PEM key and preserve \"\\n\" line breaks.";

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: i64,
}

/// Mints and caches access tokens for one service account.
pub struct ServiceAccountAuth {
    client_email: String,
    token_uri: String,
    key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    /// Parse the PEM key up front so a bad key fails at startup rather than on
    /// the first request.
    pub fn new(config: &SheetsConfig) -> Result<Self, StorageError> {
        let key = EncodingKey::from_rsa_pem(config.private_key.as_bytes())
            .map_err(|_| StorageError::Credentials(MISFORMATTED_KEY_MESSAGE.to_string()))?;
        Ok(Self {
            client_email: config.client_email.clone(),
            token_uri: config.token_uri.clone(),
            key,
            cached: Mutex::new(None),
        })
    }

    /// Sign a token-exchange assertion issued at `now` (unix seconds).
    pub fn assertion(&self, now: i64) -> Result<String, StorageError> {
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|_| StorageError::Credentials(MISFORMATTED_KEY_MESSAGE.to_string()))
    }

    /// Return a valid bearer token, exchanging a fresh assertion if the cached
    /// one is missing or about to expire. Blocking.
    pub fn access_token(&self, agent: &ureq::Agent) -> Result<String, StorageError> {
        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        if let Some(token) = self.cached_token(now) {
            return Ok(token);
        }

        let assertion = self.assertion(now)?;
        let response = agent
            .post(&self.token_uri)
            .send_form([("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(rejection(response));
        }

        let token: TokenResponse = response
            .into_body()
            .read_json()
            .map_err(|e| StorageError::Backend(format!("failed to parse token response: {}", e)))?;

        debug!(expires_in = token.expires_in, "obtained sheets access token");
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: now + token.expires_in,
        });
        Ok(token.access_token)
    }

    fn cached_token(&self, now: i64) -> Option<String> {
        let cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        cached
            .as_ref()
            .filter(|t| t.expires_at - REFRESH_MARGIN_SECS > now)
            .map(|t| t.value.clone())
    }
}
