//! Axum router wiring the dashboard, the analysis API, and the SSE stream.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use crate::handlers::{analyze, dashboard, report, system};
use crate::sse::sse_handler;
use crate::state::{AppState, SharedState};

/// Assemble the application router around shared state.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/health", get(system::health))
        // Analysis API
        .route("/api/analyze", post(analyze::analyze))
        .route("/api/report/pdf", post(report::report_pdf))
        // Progress events for the activity log
        .route("/api/events", get(sse_handler))
        // Bundled CSS/JS
        .nest_service("/static", ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
