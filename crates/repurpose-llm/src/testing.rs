//! Deterministic backend double for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{CompletionRequest, CompletionResponse, LlmBackend, LlmError};

/// Replays a scripted list of completions in call order.
///
/// Agent and handler tests use this to drive the pipeline without a live
/// model. Requests are recorded so tests can assert on prompts and
/// temperatures; an exhausted script yields [`LlmError::EmptyCompletion`].
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn calls(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn complete(&self, req: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(req);
        let next = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next {
            Some(content) => Ok(CompletionResponse {
                content,
                model: "scripted".to_string(),
                prompt_tokens: 0,
                completion_tokens: 0,
            }),
            None => Err(LlmError::EmptyCompletion),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted"
    }

    fn is_local(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_backend_replays_in_order() {
        let backend = ScriptedBackend::new(["first", "second"]);

        let a = backend
            .complete(CompletionRequest::new("s", "u"))
            .await
            .unwrap();
        let b = backend
            .complete(CompletionRequest::new("s", "u"))
            .await
            .unwrap();
        assert_eq!(a.content, "first");
        assert_eq!(b.content, "second");
        assert_eq!(backend.calls(), 2);

        let exhausted = backend.complete(CompletionRequest::new("s", "u")).await;
        assert!(matches!(exhausted, Err(LlmError::EmptyCompletion)));
    }
}
