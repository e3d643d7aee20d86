//! HTTP JSON API for commissioning submissions.
//!
//! Endpoints:
//! - GET   /health                           - Server status (never gated)
//! - POST  /api/submit                       - Public intake (rate limited)
//! - GET   /api/submissions?status=<s>       - List submissions (admin)
//! - PATCH /api/submissions/{submissionId}   - Update one submission (admin)
//!
//! Admin routes check the `x-admin-key` header against the configured
//! [`AdminPolicy`](commission_core::AdminPolicy). CORS is permissive because
//! the intake widget is embedded on a third-party storefront.
//!
//! All responses use Content-Type: application/json.

mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{middleware as axum_middleware, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use self::handlers::{
    handle_health, handle_list, handle_not_found, handle_submit, handle_update,
};
use self::middleware::{admin_middleware, rate_limit_middleware};

pub use self::error::ApiError;
pub use self::state::AppState;

/// Maximum request body size: 1 MB.
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

/// Build the full router: public intake, gated admin routes, shared layers.
pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers(Any);

    let intake = Router::new()
        .route("/api/submit", post(handle_submit))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    let admin = Router::new()
        .route("/api/submissions", get(handle_list))
        .route("/api/submissions/{submission_id}", patch(handle_update))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ));

    Router::new()
        .route("/health", get(handle_health))
        .merge(intake)
        .merge(admin)
        .fallback(handle_not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}
