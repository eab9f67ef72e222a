//! repurpose-web — Web GUI and REST API for RepurposeAI
//! Provides the analysis dashboard with:
//!   - One-shot repurposing analysis endpoint
//!   - PDF report download
//!   - Agent progress streaming over SSE
//!   - Static dashboard UI

pub mod config;
pub mod router;
pub mod handlers;
pub mod state;
pub mod sse;
