//! Pipeline error type. Every variant names the stage it came from so
//! failures in the four-call sequence stay attributable.

use repurpose_llm::LlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{agent} agent LLM call failed: {source}")]
    Llm {
        agent: &'static str,
        #[source]
        source: LlmError,
    },
    #[error("{agent} agent returned unusable output: {source}")]
    Output {
        agent: &'static str,
        #[source]
        source: LlmError,
    },
    #[error("{agent} agent output failed schema validation: {source}")]
    Schema {
        agent: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("internal serialization error: {0}")]
    Internal(#[from] serde_json::Error),
}

impl AgentError {
    pub(crate) fn llm(agent: &'static str, source: LlmError) -> Self {
        Self::Llm { agent, source }
    }

    pub(crate) fn output(agent: &'static str, source: LlmError) -> Self {
        Self::Output { agent, source }
    }

    pub(crate) fn schema(agent: &'static str, source: serde_json::Error) -> Self {
        Self::Schema { agent, source }
    }

    /// True when the failure originated in the model or its transport
    /// rather than in this service.
    pub fn is_upstream(&self) -> bool {
        !matches!(self, AgentError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_names_the_stage() {
        let err = AgentError::output("clinical", LlmError::NoJsonObject);
        assert!(err.to_string().starts_with("clinical agent"));
        assert!(err.is_upstream());
    }
}
