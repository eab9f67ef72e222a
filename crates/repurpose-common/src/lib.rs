//! repurpose-common — Shared types used across all RepurposeAI crates.

pub mod events;
pub mod schema;

// Re-export commonly used types
pub use events::{AgentId, AnalysisEvent};
pub use schema::AnalysisResult;
