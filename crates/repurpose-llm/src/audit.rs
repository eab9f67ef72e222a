//! Audit logging for LLM calls.
//!
//! Every completion the agents request goes through [`complete_audited`],
//! which times the call and emits a structured record. Output text is
//! hashed rather than logged so transcripts never land in log storage.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::backend::{CompletionRequest, CompletionResponse, LlmBackend, LlmError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmAuditEntry {
    pub id: Uuid,
    pub backend: String,
    pub model: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub output_hash: String,
    pub latency_ms: u64,
    pub called_at: chrono::DateTime<Utc>,
}

impl LlmAuditEntry {
    pub fn new(backend: &str, model: &str, response: &CompletionResponse, latency_ms: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(response.content.as_bytes());
        let output_hash = format!("{:x}", hasher.finalize());

        Self {
            id: Uuid::new_v4(),
            backend: backend.to_string(),
            model: model.to_string(),
            prompt_tokens: response.prompt_tokens,
            completion_tokens: response.completion_tokens,
            output_hash,
            latency_ms,
            called_at: Utc::now(),
        }
    }
}

/// Runs one completion and records its outcome.
pub async fn complete_audited(
    backend: &dyn LlmBackend,
    req: CompletionRequest,
) -> Result<CompletionResponse, LlmError> {
    let started = std::time::Instant::now();
    let result = backend.complete(req).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(response) => {
            let entry = LlmAuditEntry::new(backend.name(), backend.model_id(), response, latency_ms);
            tracing::info!(
                id = %entry.id,
                backend = entry.backend.as_str(),
                model = entry.model.as_str(),
                prompt_tokens = entry.prompt_tokens,
                completion_tokens = entry.completion_tokens,
                output_hash = entry.output_hash.as_str(),
                latency_ms = entry.latency_ms,
                "LLM call completed"
            );
        }
        Err(error) => {
            tracing::warn!(
                backend = backend.name(),
                model = backend.model_id(),
                latency_ms,
                error = %error,
                "LLM call failed"
            );
        }
    }

    result
}
