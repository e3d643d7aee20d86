//! HTTP middleware: intake rate limiting and the admin capability check.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use commission_core::{client_key, ADMIN_KEY_HEADER};

use crate::error::ApiError;
use crate::state::AppState;

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Per-client sliding-window limit, keyed on proxy headers.
pub(crate) async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let headers = request.headers();
    let key = client_key(
        header(headers, "x-forwarded-for"),
        header(headers, "x-real-ip"),
    );
    match state.rate_limiter.check(&key).await {
        Ok(()) => next.run(request).await,
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// Shared-secret check for admin routes. `/health` is never routed here.
pub(crate) async fn admin_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let authorized = state
        .admin
        .authorize(header(request.headers(), ADMIN_KEY_HEADER));
    match authorized {
        Ok(()) => next.run(request).await,
        Err(err) => ApiError::from(err).into_response(),
    }
}
