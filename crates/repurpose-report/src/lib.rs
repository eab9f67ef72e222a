//! repurpose-report — PDF rendering for analysis results.
//!
//! Renders an [`repurpose_common::schema::AnalysisResult`] into a typeset
//! PDF using the built-in Helvetica faces, one section per populated
//! analysis stage. No font files or other runtime assets are needed.

mod layout;
mod render;

pub use render::{render_report, ReportError, REPORT_FILENAME};
