//! Application state shared across request handlers.

use commission_core::{AdminPolicy, RateLimiter, SubmissionStore};

pub struct AppState {
    pub(crate) store: SubmissionStore,
    /// Applies to intake only.
    pub(crate) rate_limiter: RateLimiter,
    pub(crate) admin: AdminPolicy,
}

impl AppState {
    pub fn new(store: SubmissionStore, rate_limiter: RateLimiter, admin: AdminPolicy) -> Self {
        Self {
            store,
            rate_limiter,
            admin,
        }
    }
}
