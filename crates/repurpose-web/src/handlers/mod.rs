//! Request handlers for the dashboard page and the JSON API.

pub mod analyze;
pub mod dashboard;
pub mod report;
pub mod system;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use repurpose_agents::AgentError;
use repurpose_report::ReportError;

/// Error surface for the JSON API. Failures map to an HTTP status and a
/// `{"error": "..."}` body the dashboard can show directly.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Pipeline(#[from] AgentError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Pipeline(err) if err.is_upstream() => StatusCode::BAD_GATEWAY,
            ApiError::Pipeline(_) | ApiError::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(%status, "request failed: {message}");
        } else {
            tracing::warn!(%status, "request rejected: {message}");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
