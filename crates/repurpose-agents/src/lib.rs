//! repurpose-agents — the multi-agent analysis pipeline.
//!
//! Stage order: master plan → clinical evidence → patent landscape →
//! final synthesis. Specialist outputs pass through a checklist
//! refinement pass and JSON normalization before schema validation.

pub mod clinical;
pub mod error;
pub mod master;
pub mod normalize;
pub mod orchestrator;
pub mod patent;
pub mod prompts;
pub mod refine;

pub use error::AgentError;
pub use orchestrator::Orchestrator;
