//! One-shot repurposing analysis endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::handlers::ApiError;
use crate::state::SharedState;

/// Minimum length for the free-text query, matching the dashboard input.
const MIN_QUERY_LEN: usize = 5;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub query: String,
}

/// Runs the full agent pipeline for one query and returns the combined
/// result. Progress events stream separately over `/api/events`.
pub async fn analyze(
    State(state): State<SharedState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let query = payload.query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return Err(ApiError::Validation(format!(
            "query must be at least {MIN_QUERY_LEN} characters"
        )));
    }

    let result = state.orchestrator().run(query).await?;
    Ok(Json(result))
}
