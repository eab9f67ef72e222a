//! PDF report download endpoint.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use repurpose_common::schema::AnalysisResult;
use repurpose_common::AnalysisEvent;
use repurpose_report::{render_report, REPORT_FILENAME};

use crate::handlers::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub analysis: AnalysisResult,
}

/// Renders the posted analysis into a PDF and returns it as a download.
/// The client sends back the same JSON it received from `/api/analyze`,
/// so reports can be produced without re-running the pipeline.
pub async fn report_pdf(
    State(state): State<SharedState>,
    Json(payload): Json<ReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = render_report(&payload.analysis)?;
    let _ = state.event_tx.send(AnalysisEvent::ReportGenerated {
        size_bytes: bytes.len(),
    });

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={REPORT_FILENAME}"),
        ),
    ];
    Ok((headers, bytes))
}
