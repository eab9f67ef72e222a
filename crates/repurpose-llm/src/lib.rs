//! repurpose-llm — LLM backend abstraction for the analysis agents.
//!
//! The [`backend::LlmBackend`] trait hides which provider serves a
//! completion; [`extract`] recovers strict JSON from whatever the model
//! actually returned; [`audit`] records every call.

pub mod audit;
pub mod backend;
pub mod extract;
pub mod testing;

pub use audit::complete_audited;
pub use backend::{CompletionRequest, CompletionResponse, LlmBackend, LlmError};
