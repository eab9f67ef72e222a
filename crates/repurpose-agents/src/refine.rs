//! Checklist-driven refinement pass.
//!
//! One critique-and-revise call: a validator prompt receives the draft
//! JSON plus the agent's checklist and returns revised JSON. A single
//! pass keeps latency bounded at four extra round trips per analysis at
//! most.

use repurpose_llm::{complete_audited, CompletionRequest, LlmBackend, LlmError};

use crate::prompts;

const REFINE_TEMPERATURE: f32 = 0.1;

pub async fn refine_with_checklist(
    llm: &dyn LlmBackend,
    draft: &str,
    checklist: &[&str],
) -> Result<String, LlmError> {
    let user = format!("\nCHECKLIST:\n{checklist:?}\n\nJSON OUTPUT:\n{draft}\n");
    let req = CompletionRequest::new(prompts::REFINER_SYSTEM, user)
        .with_temperature(REFINE_TEMPERATURE);
    let response = complete_audited(llm, req).await?;
    Ok(response.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use repurpose_llm::testing::ScriptedBackend;

    #[tokio::test]
    async fn test_refine_sends_checklist_and_draft_at_low_temperature() {
        let backend = ScriptedBackend::new([r#"{"revised": true}"#]);

        let revised = refine_with_checklist(
            &backend,
            r#"{"draft": true}"#,
            &["Claims are conservative", "No overstated conclusions"],
        )
        .await
        .unwrap();
        assert_eq!(revised, r#"{"revised": true}"#);

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, REFINE_TEMPERATURE);
        assert!(requests[0].system.contains("reasoning validator"));
        assert!(requests[0].user.contains("CHECKLIST:"));
        assert!(requests[0].user.contains("Claims are conservative"));
        assert!(requests[0].user.contains(r#"{"draft": true}"#));
    }
}
