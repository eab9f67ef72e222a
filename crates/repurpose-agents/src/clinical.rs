//! Clinical evidence agent.

use repurpose_common::schema::{ClinicalReport, MasterPlan};
use repurpose_llm::{complete_audited, extract::extract_json_object, CompletionRequest, LlmBackend};
use serde_json::Value;

use crate::error::AgentError;
use crate::normalize::normalize_list_field;
use crate::prompts;
use crate::refine::refine_with_checklist;

const EVIDENCE_TEMPERATURE: f32 = 0.2;

/// Summarizes public clinical evidence for the planned drug/indication.
pub async fn run(llm: &dyn LlmBackend, plan: &MasterPlan) -> Result<ClinicalReport, AgentError> {
    let user = serde_json::to_string(plan)?;

    let req = CompletionRequest::new(prompts::CLINICAL_SYSTEM, user.as_str())
        .with_temperature(EVIDENCE_TEMPERATURE);
    let draft = complete_audited(llm, req)
        .await
        .map_err(|e| AgentError::llm("clinical", e))?;

    let refined = refine_with_checklist(llm, &draft.content, &prompts::CLINICAL_CHECKLIST)
        .await
        .map_err(|e| AgentError::llm("clinical", e))?;

    let mut value = extract_json_object(&refined).map_err(|e| AgentError::output("clinical", e))?;
    normalize_list_field(&mut value, "confidence_notes");
    if let Some(evidence) = value.get_mut("evidence").and_then(Value::as_array_mut) {
        for item in evidence {
            normalize_list_field(item, "limitations");
        }
    }

    serde_json::from_value(value).map_err(|e| AgentError::schema("clinical", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use repurpose_llm::testing::ScriptedBackend;

    fn sample_plan() -> MasterPlan {
        serde_json::from_str(
            r#"{
                "drug": "Metformin",
                "indication": "ulcerative colitis",
                "objectives": ["Assess evidence"],
                "tasks": [],
                "assumptions": [],
                "constraints": [],
                "required_sources": []
            }"#,
        )
        .unwrap()
    }

    const REPORT_JSON: &str = r#"{
        "drug": "Metformin",
        "indication": "ulcerative colitis",
        "evidence": [
            {
                "source_id": "PMID-32219890",
                "study_type": "retrospective cohort",
                "sample_size": "1374",
                "outcome_summary": "Reduced flare frequency in diabetic IBD patients",
                "statistical_signal": "positive",
                "limitations": [{ "description": "confounded by diabetes status" }, "single country"]
            }
        ],
        "overall_signal": "moderate",
        "confidence_notes": ["Evidence is observational", { "description": "No prospective trials" }]
    }"#;

    #[tokio::test]
    async fn test_run_normalizes_nested_limitations() {
        let backend = ScriptedBackend::new(["draft output, not used directly", REPORT_JSON]);

        let report = run(&backend, &sample_plan()).await.unwrap();
        assert_eq!(report.overall_signal.as_str(), "moderate");
        assert_eq!(report.evidence.len(), 1);
        assert_eq!(report.evidence[0].sample_size, Some(1374));
        assert_eq!(
            report.evidence[0].limitations,
            vec![
                "confounded by diabetes status".to_string(),
                "single country".to_string()
            ]
        );
        assert_eq!(
            report.confidence_notes,
            vec![
                "Evidence is observational".to_string(),
                "No prospective trials".to_string()
            ]
        );

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].temperature, EVIDENCE_TEMPERATURE);
        // The specialist receives the serialized master plan as its input.
        assert!(requests[0].user.contains("\"drug\":\"Metformin\""));
    }

    #[tokio::test]
    async fn test_run_rejects_unknown_signal_vocabulary() {
        let reply = r#"{
            "drug": "Metformin",
            "indication": "ulcerative colitis",
            "evidence": [],
            "overall_signal": "overwhelming",
            "confidence_notes": []
        }"#;
        let backend = ScriptedBackend::new(["draft", reply]);

        let err = run(&backend, &sample_plan()).await.unwrap_err();
        assert!(matches!(err, AgentError::Schema { agent: "clinical", .. }));
    }
}
