//! Patent landscape agent.

use repurpose_common::schema::{MasterPlan, PatentReport};
use repurpose_llm::{complete_audited, extract::extract_json_object, CompletionRequest, LlmBackend};

use crate::error::AgentError;
use crate::normalize::normalize_list_field;
use crate::prompts;
use crate::refine::refine_with_checklist;

const LANDSCAPE_TEMPERATURE: f32 = 0.2;

/// Assesses patent exposure for the planned drug/indication.
pub async fn run(llm: &dyn LlmBackend, plan: &MasterPlan) -> Result<PatentReport, AgentError> {
    let user = serde_json::to_string(plan)?;

    let req = CompletionRequest::new(prompts::PATENT_SYSTEM, user.as_str())
        .with_temperature(LANDSCAPE_TEMPERATURE);
    let draft = complete_audited(llm, req)
        .await
        .map_err(|e| AgentError::llm("patent", e))?;

    let refined = refine_with_checklist(llm, &draft.content, &prompts::PATENT_CHECKLIST)
        .await
        .map_err(|e| AgentError::llm("patent", e))?;

    let mut value = extract_json_object(&refined).map_err(|e| AgentError::output("patent", e))?;
    normalize_list_field(&mut value, "risks");
    normalize_list_field(&mut value, "whitespace_opportunities");
    // A wrapped {"status": ...} freedom_to_operate is unwrapped by the
    // schema deserializer.

    serde_json::from_value(value).map_err(|e| AgentError::schema("patent", e))
}
