//! Public request/response contract.

use serde::{Deserialize, Serialize};

use rxguard_core::{Decision, ProofCard, Risk, RxGuardProfile};

/// Which baseline models to consult when the caller opts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineSelector {
    A,
    B,
    Both,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RxGuardRequest {
    pub question: String,
    pub primary_drug: Option<String>,
    #[serde(default)]
    pub other_meds: Vec<String>,
    pub profile: Option<RxGuardProfile>,
    #[serde(default)]
    pub include_baseline_answer: bool,
    pub baseline_selector: Option<BaselineSelector>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineAnswers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_a: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_b: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_drug: Option<String>,
    pub rules_triggered: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_doc_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RxGuardResponse {
    pub decision: Decision,
    pub risk: Risk,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarifying_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_card: Option<ProofCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<BaselineAnswers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxguard_core::PregnancyStatus;

    #[test]
    fn request_parses_from_contract_json() {
        let json = r#"{
            "question": "Can I take this?",
            "primaryDrug": "Advil",
            "otherMeds": ["Warfarin"],
            "profile": { "pregnancy": "trying" },
            "includeBaselineAnswer": true,
            "baselineSelector": "both"
        }"#;
        let req: RxGuardRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.primary_drug.as_deref(), Some("Advil"));
        assert_eq!(req.other_meds, vec!["Warfarin"]);
        assert_eq!(
            req.profile.unwrap().pregnancy,
            Some(PregnancyStatus::Trying)
        );
        assert!(req.include_baseline_answer);
        assert_eq!(req.baseline_selector, Some(BaselineSelector::Both));
    }

    #[test]
    fn minimal_request_defaults() {
        let req: RxGuardRequest = serde_json::from_str(r#"{"question": "hi"}"#).unwrap();
        assert!(req.primary_drug.is_none());
        assert!(req.other_meds.is_empty());
        assert!(!req.include_baseline_answer);
    }

    #[test]
    fn response_serializes_with_camel_case_and_skips_none() {
        let resp = RxGuardResponse {
            decision: Decision::Clarify,
            risk: Risk::Unknown,
            message: "m".into(),
            clarifying_question: Some("q".into()),
            proof_card: None,
            baseline: None,
            debug: Some(DebugInfo {
                resolved_drug: None,
                rules_triggered: vec![],
                label_doc_id: None,
            }),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"decision\":\"CLARIFY\""));
        assert!(json.contains("\"clarifyingQuestion\""));
        assert!(!json.contains("proofCard"));
        assert!(json.contains("\"rulesTriggered\":[]"));
    }
}
