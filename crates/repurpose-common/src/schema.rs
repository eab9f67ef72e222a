//! Typed data model for the drug repurposing analysis pipeline.
//!
//! These shapes mirror the JSON the agents instruct the model to emit.
//! Parsing is lenient where model output drifts in practice (integers as
//! strings, a status object where a plain string was asked for, missing
//! lists); the enum vocabularies stay strict so downstream consumers can
//! rely on them.

use serde::{Deserialize, Serialize};

// ── Master plan ──

/// Investigation plan produced by the master agent from the user query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterPlan {
    pub drug: String,
    pub indication: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<MasterTask>,
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub required_sources: Vec<String>,
}

/// A single task the master agent delegates to a specialist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterTask {
    pub task_id: String,
    pub agent: TaskAgent,
    pub description: String,
    pub priority: TaskPriority,
}

/// Specialist a delegated task is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAgent {
    Clinical,
    Patent,
}

impl TaskAgent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskAgent::Clinical => "clinical",
            TaskAgent::Patent => "patent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
        }
    }
}

// ── Clinical evidence ──

/// Clinical evidence summary for the drug/indication pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalReport {
    pub drug: String,
    pub indication: String,
    #[serde(default)]
    pub evidence: Vec<ClinicalEvidence>,
    pub overall_signal: OverallSignal,
    #[serde(default)]
    pub confidence_notes: Vec<String>,
}

/// One cited study or dataset backing the clinical report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalEvidence {
    pub source_id: String,
    pub study_type: String,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub sample_size: Option<i64>,
    pub outcome_summary: String,
    pub statistical_signal: StatisticalSignal,
    #[serde(default)]
    pub limitations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticalSignal {
    Positive,
    Mixed,
    Negative,
    Inconclusive,
}

impl StatisticalSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatisticalSignal::Positive => "positive",
            StatisticalSignal::Mixed => "mixed",
            StatisticalSignal::Negative => "negative",
            StatisticalSignal::Inconclusive => "inconclusive",
        }
    }
}

/// Aggregate strength of the clinical evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallSignal {
    Strong,
    Moderate,
    Weak,
    Insufficient,
}

impl OverallSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallSignal::Strong => "strong",
            OverallSignal::Moderate => "moderate",
            OverallSignal::Weak => "weak",
            OverallSignal::Insufficient => "insufficient",
        }
    }
}

// ── Patent landscape ──

/// Patent landscape summary for the drug/indication pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatentReport {
    pub drug: String,
    pub indication: String,
    #[serde(default)]
    pub key_patents: Vec<PatentItem>,
    #[serde(deserialize_with = "lenient::fto")]
    pub freedom_to_operate: FreedomToOperate,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub whitespace_opportunities: Vec<String>,
}

/// A patent the landscape analysis considers relevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatentItem {
    pub patent_id: String,
    pub jurisdiction: String,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub filing_year: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub expiry_year: Option<i64>,
    pub coverage_type: String,
    pub relevance: PatentRelevance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatentRelevance {
    High,
    Medium,
    Low,
}

impl PatentRelevance {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatentRelevance::High => "high",
            PatentRelevance::Medium => "medium",
            PatentRelevance::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreedomToOperate {
    High,
    Moderate,
    Low,
    Unclear,
}

impl FreedomToOperate {
    pub fn as_str(&self) -> &'static str {
        match self {
            FreedomToOperate::High => "high",
            FreedomToOperate::Moderate => "moderate",
            FreedomToOperate::Low => "low",
            FreedomToOperate::Unclear => "unclear",
        }
    }
}

// ── Final synthesis ──

/// Decision-ready assessment combining the specialist reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalSynthesis {
    pub hypothesis_strength_score: HypothesisScore,
    #[serde(default)]
    pub aligned_signals: Vec<String>,
    #[serde(default)]
    pub contradictions: Vec<String>,
    #[serde(default)]
    pub key_risks: Vec<String>,
    pub opportunity_summary: String,
    #[serde(default)]
    pub recommended_next_steps: Vec<String>,
    #[serde(default)]
    pub explicit_limitations: Vec<String>,
}

/// Hypothesis strength on a 0..=10 scale with its rationale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HypothesisScore {
    #[serde(deserialize_with = "lenient::int")]
    pub value: i64,
    #[serde(default)]
    pub rationale: Vec<String>,
}

// ── Analysis envelope ──

/// Full result of one analysis run. Sections are optional so partial
/// results (for example a report payload assembled by a client) still
/// deserialize; a successful run populates all four.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<MasterPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical: Option<ClinicalReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patent: Option<PatentReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthesis: Option<FinalSynthesis>,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.master.is_none()
            && self.clinical.is_none()
            && self.patent.is_none()
            && self.synthesis.is_none()
    }
}

/// Deserialization helpers for fields the model does not always emit in
/// the requested shape.
mod lenient {
    use serde::{Deserialize, Deserializer};

    use super::FreedomToOperate;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntLike {
        Int(i64),
        Float(f64),
        Text(String),
    }

    fn to_i64<E: serde::de::Error>(raw: IntLike) -> Result<i64, E> {
        match raw {
            IntLike::Int(n) => Ok(n),
            IntLike::Float(f) => Ok(f as i64),
            IntLike::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| E::custom(format!("invalid integer: {s:?}"))),
        }
    }

    pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        to_i64(IntLike::deserialize(deserializer)?)
    }

    pub fn opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<IntLike>::deserialize(deserializer)? {
            Some(raw) => to_i64(raw).map(Some),
            None => Ok(None),
        }
    }

    /// Accepts either `"moderate"` or `{"status": "moderate"}`.
    pub fn fto<'de, D>(deserializer: D) -> Result<FreedomToOperate, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Plain(FreedomToOperate),
            Wrapped { status: FreedomToOperate },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Plain(value) => value,
            Raw::Wrapped { status } => status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_score_value_accepts_string_and_float() {
        let score: HypothesisScore =
            serde_json::from_value(json!({ "value": "7", "rationale": [] })).unwrap();
        assert_eq!(score.value, 7);

        let score: HypothesisScore =
            serde_json::from_value(json!({ "value": 6.8, "rationale": ["r"] })).unwrap();
        assert_eq!(score.value, 6);
    }

    #[test]
    fn test_score_value_rejects_garbage() {
        let result: Result<HypothesisScore, _> =
            serde_json::from_value(json!({ "value": "strong", "rationale": [] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_freedom_to_operate_unwraps_status_object() {
        let report: PatentReport = serde_json::from_value(json!({
            "drug": "Metformin",
            "indication": "IBD",
            "key_patents": [],
            "freedom_to_operate": { "status": "moderate" },
            "risks": [],
            "whitespace_opportunities": []
        }))
        .unwrap();
        assert_eq!(report.freedom_to_operate, FreedomToOperate::Moderate);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let plan: MasterPlan = serde_json::from_value(json!({
            "drug": "Metformin",
            "indication": "ulcerative colitis"
        }))
        .unwrap();
        assert!(plan.objectives.is_empty());
        assert!(plan.tasks.is_empty());
        assert!(plan.required_sources.is_empty());
    }

    #[test]
    fn test_enum_vocabulary_is_snake_case_and_strict() {
        let signal: StatisticalSignal = serde_json::from_value(json!("inconclusive")).unwrap();
        assert_eq!(signal.as_str(), "inconclusive");

        let bad: Result<OverallSignal, _> = serde_json::from_value(json!("overwhelming"));
        assert!(bad.is_err());
    }

    #[test]
    fn test_sample_size_tolerates_numeric_strings() {
        let evidence: ClinicalEvidence = serde_json::from_value(json!({
            "source_id": "PMID-1",
            "study_type": "RCT",
            "sample_size": "1200",
            "outcome_summary": "reduced flares",
            "statistical_signal": "positive",
            "limitations": []
        }))
        .unwrap();
        assert_eq!(evidence.sample_size, Some(1200));
    }

    #[test]
    fn test_result_serialization_omits_absent_sections() {
        let result = AnalysisResult::default();
        assert!(result.is_empty());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({}));
    }
}
