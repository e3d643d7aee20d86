//! Route handlers: health, intake, admin list and update.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use commission_core::{IntakePayload, Status, Submission, SubmissionUpdate};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::json_error;
use crate::state::AppState;

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

fn bad_body(rejection: JsonRejection) -> Response {
    json_error(StatusCode::BAD_REQUEST, &rejection.body_text()).into_response()
}

/// POST /api/submit
pub(crate) async fn handle_submit(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return Ok(bad_body(rejection)),
    };
    let payload = IntakePayload::from_json(&body)?;
    let submission = state.store.create(payload).await?;
    info!(id = %submission.id, "accepted submission");

    let response = serde_json::json!({
        "ok": true,
        "submissionId": submission.id,
    });
    Ok((StatusCode::OK, Json(response)).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListParams {
    status: Option<String>,
}

/// GET /api/submissions?status=<s>
pub(crate) async fn handle_list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    // Unknown status values list everything.
    let filter = params.status.as_deref().and_then(Status::parse);
    let submissions: Vec<Submission> = state.store.list(filter).await?;
    Ok(Json(serde_json::json!({ "submissions": submissions })))
}

/// PATCH /api/submissions/{submission_id}
pub(crate) async fn handle_update(
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return Ok(bad_body(rejection)),
    };
    let update = SubmissionUpdate::from_json(&body);
    let submission = state.store.update(&submission_id, update).await?;
    Ok(Json(submission).into_response())
}
