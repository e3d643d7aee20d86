use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use commission_core::CommissionError;

use crate::json_error;

/// Handler error: a [`CommissionError`] rendered as `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError(pub CommissionError);

impl From<CommissionError> for ApiError {
    fn from(err: CommissionError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CommissionError::Validation { .. } | CommissionError::InvalidTransition { .. } => {
                StatusCode::BAD_REQUEST
            }
            CommissionError::NotFound { .. } => StatusCode::NOT_FOUND,
            CommissionError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            CommissionError::Unauthorized => StatusCode::UNAUTHORIZED,
            CommissionError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();
        match self.0 {
            CommissionError::RateLimited { retry_after_secs } => {
                let body = serde_json::json!({
                    "error": message,
                    "retry_after": retry_after_secs,
                });
                (status, Json(body)).into_response()
            }
            _ => json_error(status, &message).into_response(),
        }
    }
}
