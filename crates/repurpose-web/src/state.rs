//! Per-process state handed to every request handler.

use std::sync::Arc;

use tokio::sync::broadcast;

use repurpose_agents::Orchestrator;
use repurpose_common::AnalysisEvent;
use repurpose_llm::LlmBackend;

/// Everything a handler needs: the configured LLM backend plus the
/// progress-event channel feeding `/api/events`.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmBackend>,
    /// Fan-out channel for pipeline progress events
    pub event_tx: broadcast::Sender<AnalysisEvent>,
}

impl AppState {
    pub fn new(llm: Arc<dyn LlmBackend>) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self { llm, event_tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisEvent> {
        self.event_tx.subscribe()
    }

    /// Orchestrator wired to this server's LLM backend and event channel.
    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(self.llm.clone()).with_events(self.event_tx.clone())
    }
}

pub type SharedState = Arc<AppState>;
