//! Master agent: turns the user query into an investigation plan, and
//! later synthesizes the specialist reports into the final assessment.

use repurpose_common::schema::{ClinicalReport, FinalSynthesis, MasterPlan, PatentReport};
use repurpose_llm::{complete_audited, extract::extract_json_object, CompletionRequest, LlmBackend};
use serde_json::json;

use crate::error::AgentError;
use crate::normalize::normalize_list_field;
use crate::prompts;
use crate::refine::refine_with_checklist;

const PLAN_TEMPERATURE: f32 = 0.3;
const SYNTHESIS_TEMPERATURE: f32 = 0.25;
const SYNTHESIS_RETRY_TEMPERATURE: f32 = 0.1;

pub async fn plan(llm: &dyn LlmBackend, query: &str) -> Result<MasterPlan, AgentError> {
    let req = CompletionRequest::new(prompts::MASTER_PLAN_SYSTEM, format!("Query: {query}"))
        .with_temperature(PLAN_TEMPERATURE);
    let draft = complete_audited(llm, req)
        .await
        .map_err(|e| AgentError::llm("master", e))?;

    let refined = refine_with_checklist(llm, &draft.content, &prompts::MASTER_PLAN_CHECKLIST)
        .await
        .map_err(|e| AgentError::llm("master", e))?;

    let mut value = extract_json_object(&refined).map_err(|e| AgentError::output("master", e))?;
    for key in ["objectives", "assumptions", "constraints", "required_sources"] {
        normalize_list_field(&mut value, key);
    }

    serde_json::from_value(value).map_err(|e| AgentError::schema("master", e))
}

pub async fn synthesize(
    llm: &dyn LlmBackend,
    plan: &MasterPlan,
    clinical: &ClinicalReport,
    patent: &PatentReport,
) -> Result<FinalSynthesis, AgentError> {
    let user = serde_json::to_string(&json!({
        "plan": plan,
        "clinical": clinical,
        "patent": patent,
    }))?;

    let req = CompletionRequest::new(prompts::SYNTHESIS_SYSTEM, user.as_str())
        .with_temperature(SYNTHESIS_TEMPERATURE);
    let first = complete_audited(llm, req)
        .await
        .map_err(|e| AgentError::llm("synthesis", e))?;

    let mut value = match extract_json_object(&first.content) {
        Ok(value) => value,
        Err(error) => {
            // One strict retry before giving up on the synthesis stage.
            tracing::warn!(error = %error, "synthesis output unusable, retrying with strict prompt");
            let strict = format!("{}{}", prompts::SYNTHESIS_SYSTEM, prompts::STRICT_JSON_SUFFIX);
            let retry = complete_audited(
                llm,
                CompletionRequest::new(strict, user.as_str())
                    .with_temperature(SYNTHESIS_RETRY_TEMPERATURE),
            )
            .await
            .map_err(|e| AgentError::llm("synthesis", e))?;
            extract_json_object(&retry.content).map_err(|e| AgentError::output("synthesis", e))?
        }
    };

    for key in [
        "aligned_signals",
        "key_risks",
        "recommended_next_steps",
        "explicit_limitations",
        "contradictions",
    ] {
        normalize_list_field(&mut value, key);
    }
    if let Some(score) = value.get_mut("hypothesis_strength_score") {
        normalize_list_field(score, "rationale");
    }

    serde_json::from_value(value).map_err(|e| AgentError::schema("synthesis", e))
}
