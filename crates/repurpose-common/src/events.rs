//! Progress events emitted by the analysis pipeline.
//!
//! The orchestrator broadcasts these while a run is in flight; the web
//! layer forwards them to connected clients via SSE.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline stage identifier. Matches the agent card ids the dashboard
/// uses, plus the synthesis stage that has no card of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    Master,
    Clinical,
    Patent,
    Synthesis,
}

impl AgentId {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentId::Master => "master",
            AgentId::Clinical => "clinical",
            AgentId::Patent => "patent",
            AgentId::Synthesis => "synthesis",
        }
    }
}

/// Progress events emitted while an analysis runs, streamed to the
/// dashboard over SSE.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisEvent {
    /// An analysis run was accepted and is starting
    AnalysisStarted { run_id: Uuid, query: String },
    /// A pipeline stage began work
    AgentStarted { run_id: Uuid, agent: AgentId },
    /// A pipeline stage finished successfully
    AgentCompleted { run_id: Uuid, agent: AgentId },
    /// The full pipeline finished and a result is available
    AnalysisCompleted { run_id: Uuid },
    /// The pipeline aborted with an error
    AnalysisFailed { run_id: Uuid, message: String },
    /// A PDF report was rendered
    ReportGenerated { size_bytes: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_tag_with_snake_case_type() {
        let event = AnalysisEvent::AgentStarted {
            run_id: Uuid::nil(),
            agent: AgentId::Clinical,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "agent_started");
        assert_eq!(value["agent"], "clinical");
    }

    #[test]
    fn test_agent_id_round_trips() {
        for agent in [
            AgentId::Master,
            AgentId::Clinical,
            AgentId::Patent,
            AgentId::Synthesis,
        ] {
            let json = serde_json::to_string(&agent).unwrap();
            assert_eq!(json, format!("\"{}\"", agent.as_str()));
        }
    }
}
