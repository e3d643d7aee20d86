//! Sliding-window limiter for public intake.

use std::collections::HashMap;
use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::warn;

use crate::clock::Clock;
use crate::error::CommissionError;

/// Accepted submissions per window per client.
pub const DEFAULT_MAX_PER_WINDOW: usize = 20;
/// Window length in seconds.
pub const DEFAULT_WINDOW_SECS: u64 = 60;

/// Client identity used when no proxy header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Number of tracked keys above which idle keys are swept.
const SWEEP_THRESHOLD: usize = 1024;

/// Per-client sliding-window rate limiter.
///
/// Each key keeps the instants of its accepted attempts inside the window.
/// Rejected attempts are not recorded. State is process-local.
pub struct RateLimiter {
    attempts: Mutex<HashMap<String, Vec<OffsetDateTime>>>,
    max_per_window: usize,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(max_per_window: usize, window_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            attempts: Mutex::new(HashMap::new()),
            max_per_window,
            window: Duration::seconds(window_secs.min(i64::MAX as u64) as i64),
            clock,
        }
    }

    /// 20 per 60 seconds.
    pub fn with_defaults(clock: Arc<dyn Clock>) -> Self {
        Self::new(DEFAULT_MAX_PER_WINDOW, DEFAULT_WINDOW_SECS, clock)
    }

    /// Record an attempt by `key`, or reject it when the window is full.
    pub async fn check(&self, key: &str) -> Result<(), CommissionError> {
        let now = self.clock.now();
        // No cutoff when the window reaches back past the earliest date.
        let cutoff = now.checked_sub(self.window);
        let in_window = |t: &OffsetDateTime| cutoff.map_or(true, |c| *t > c);
        let mut attempts = self.attempts.lock().await;

        if attempts.len() > SWEEP_THRESHOLD {
            attempts.retain(|_, seen| seen.iter().any(in_window));
        }

        let seen = attempts.entry(key.to_string()).or_default();
        seen.retain(in_window);

        if seen.len() >= self.max_per_window {
            let oldest = seen.iter().min().copied().unwrap_or(now);
            let remaining = oldest
                .checked_add(self.window)
                .map_or(i64::MAX, |end| (end - now).whole_seconds())
                .max(1);
            warn!(client = key, retry_after_secs = remaining, "intake rate limit reached");
            return Err(CommissionError::RateLimited {
                retry_after_secs: remaining as u64,
            });
        }

        seen.push(now);
        Ok(())
    }
}

/// Client identity from proxy headers: the first `x-forwarded-for` entry,
/// else `x-real-ip`, else [`UNKNOWN_CLIENT`].
pub fn client_key(forwarded_for: Option<&str>, real_ip: Option<&str>) -> String {
    let forwarded = forwarded_for
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real = real_ip.map(str::trim).filter(|v| !v.is_empty());
    forwarded
        .or(real)
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}
