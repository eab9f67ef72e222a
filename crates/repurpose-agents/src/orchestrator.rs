//! Runs the four pipeline stages in order and reports progress.
//!
//! Stages run sequentially: both specialists consume the master plan, and
//! the synthesis needs both specialist reports. Progress is broadcast as
//! [`AnalysisEvent`]s when an event channel is attached; without one the
//! orchestrator just runs quietly.

use std::future::Future;
use std::sync::Arc;

use repurpose_common::events::{AgentId, AnalysisEvent};
use repurpose_common::schema::AnalysisResult;
use repurpose_llm::LlmBackend;
use tokio::sync::broadcast;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::AgentError;
use crate::{clinical, master, patent};

pub struct Orchestrator {
    llm: Arc<dyn LlmBackend>,
    events: Option<broadcast::Sender<AnalysisEvent>>,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn LlmBackend>) -> Self {
        Self { llm, events: None }
    }

    pub fn with_events(mut self, events: broadcast::Sender<AnalysisEvent>) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: AnalysisEvent) {
        if let Some(tx) = &self.events {
            // Send only fails when nobody is subscribed, which is fine.
            let _ = tx.send(event);
        }
    }

    /// Runs one full analysis for `query`.
    pub async fn run(&self, query: &str) -> Result<AnalysisResult, AgentError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("analysis", run_id = %run_id);
        self.run_with_id(run_id, query).instrument(span).await
    }

    async fn run_with_id(&self, run_id: Uuid, query: &str) -> Result<AnalysisResult, AgentError> {
        tracing::info!(query, "analysis started");
        self.emit(AnalysisEvent::AnalysisStarted {
            run_id,
            query: query.to_string(),
        });

        let result = self.run_stages(run_id, query).await;
        match &result {
            Ok(_) => {
                tracing::info!("analysis completed");
                self.emit(AnalysisEvent::AnalysisCompleted { run_id });
            }
            Err(error) => {
                tracing::error!(error = %error, "analysis failed");
                self.emit(AnalysisEvent::AnalysisFailed {
                    run_id,
                    message: error.to_string(),
                });
            }
        }
        result
    }

    async fn run_stages(&self, run_id: Uuid, query: &str) -> Result<AnalysisResult, AgentError> {
        let llm = self.llm.as_ref();

        let plan = self
            .stage(run_id, AgentId::Master, master::plan(llm, query))
            .await?;
        let clinical = self
            .stage(run_id, AgentId::Clinical, clinical::run(llm, &plan))
            .await?;
        let patent = self
            .stage(run_id, AgentId::Patent, patent::run(llm, &plan))
            .await?;
        let synthesis = self
            .stage(
                run_id,
                AgentId::Synthesis,
                master::synthesize(llm, &plan, &clinical, &patent),
            )
            .await?;

        Ok(AnalysisResult {
            master: Some(plan),
            clinical: Some(clinical),
            patent: Some(patent),
            synthesis: Some(synthesis),
        })
    }

    async fn stage<T, F>(&self, run_id: Uuid, agent: AgentId, fut: F) -> Result<T, AgentError>
    where
        F: Future<Output = Result<T, AgentError>>,
    {
        tracing::info!(agent = agent.as_str(), "stage started");
        self.emit(AnalysisEvent::AgentStarted { run_id, agent });

        let result = fut.await;
        match &result {
            Ok(_) => {
                tracing::info!(agent = agent.as_str(), "stage completed");
                self.emit(AnalysisEvent::AgentCompleted { run_id, agent });
            }
            Err(error) => {
                tracing::error!(agent = agent.as_str(), error = %error, "stage failed");
            }
        }
        result
    }
}
