//! Response composition: gate a question through resolution, policy, and
//! proof-card verification, then assemble the public response.

pub mod api;

use thiserror::Error;
use tracing::info;

use rxguard_baseline::{BaselineClient, answer_or_diagnostic};
use rxguard_core::{Decision, ResolutionOutcome, Risk};
use rxguard_policy::{CLARIFY_QUESTION, build_proof_card, evaluate};
use rxguard_source::LabelSource;
use rxguard_store::{ResolutionCache, StoreError};

pub use api::{BaselineAnswers, BaselineSelector, DebugInfo, RxGuardRequest, RxGuardResponse};

/// Fixed educational disclaimer; every message ends with it.
pub const DISCLAIMER: &str = "This is educational information from the product label, \
not medical advice. Talk to a pharmacist or clinician before making medication decisions.";

/// Evidence snippets embedded in the human-readable message.
const MAX_MESSAGE_SNIPPETS: usize = 3;
const SNIPPET_LEN: usize = 160;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Upstream/source/store failure; deliberately propagated unrecovered.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The response composer: owns the resolution cache and the optional
/// baseline collaborators.
pub struct RxGuardService<S> {
    cache: ResolutionCache<S>,
    baseline_a: Option<BaselineClient>,
    baseline_b: Option<BaselineClient>,
}

impl<S: LabelSource> RxGuardService<S> {
    pub fn new(cache: ResolutionCache<S>) -> Self {
        Self {
            cache,
            baseline_a: None,
            baseline_b: None,
        }
    }

    pub fn with_baselines(
        cache: ResolutionCache<S>,
        baseline_a: Option<BaselineClient>,
        baseline_b: Option<BaselineClient>,
    ) -> Self {
        Self {
            cache,
            baseline_a,
            baseline_b,
        }
    }

    /// Answer one question.
    ///
    /// Missing-input, not-found, and ambiguous paths all return a complete
    /// CLARIFY response; only upstream/store failures surface as errors.
    /// The baseline fan-out runs independently of the gating outcome and can
    /// never fail the primary response.
    pub async fn answer(&self, request: &RxGuardRequest) -> Result<RxGuardResponse, ServiceError> {
        let mut response = self.gated_answer(request).await?;
        response.baseline = self.baseline_answers(request).await;
        Ok(response)
    }

    async fn gated_answer(&self, request: &RxGuardRequest) -> Result<RxGuardResponse, ServiceError> {
        let Some(drug) = request
            .primary_drug
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
        else {
            return Ok(clarify_response(
                "I need the medication name to look up its label.".to_string(),
                CLARIFY_QUESTION.to_string(),
                Vec::new(),
                None,
            ));
        };

        match self.cache.resolve(drug).await? {
            ResolutionOutcome::NotFound { reason } => Ok(clarify_response(
                format!("I could not find a label record: {reason}."),
                "Could you give the exact product name as printed on the package?".to_string(),
                Vec::new(),
                None,
            )),
            ResolutionOutcome::Ambiguous { options, reason } => {
                let listing = options
                    .iter()
                    .map(|o| format!("- {}", o.summary()))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(clarify_response(
                    format!("That name is ambiguous: {reason}.\n{listing}"),
                    "Which of these formulations do you mean?".to_string(),
                    Vec::new(),
                    None,
                ))
            }
            ResolutionOutcome::Resolved(snapshot) => {
                let policy = evaluate(
                    &snapshot,
                    request.profile.as_ref(),
                    &request.other_meds,
                );
                let card = build_proof_card(&snapshot, &policy.quotes);
                let message = compose_message(snapshot.display_name(), &policy, &card);
                info!(
                    drug = %snapshot.display_name(),
                    decision = policy.decision.as_str(),
                    risk = policy.risk.as_str(),
                    "composed answer"
                );
                Ok(RxGuardResponse {
                    decision: policy.decision,
                    risk: policy.risk,
                    message,
                    clarifying_question: policy.clarifying_question.clone(),
                    proof_card: Some(card),
                    baseline: None,
                    debug: Some(DebugInfo {
                        resolved_drug: Some(snapshot.display_name().to_string()),
                        rules_triggered: policy.rules_triggered,
                        label_doc_id: Some(snapshot.doc_id()),
                    }),
                })
            }
        }
    }

    /// One answer per selected model; failures become inline diagnostics.
    /// Both models run concurrently when both are selected.
    async fn baseline_answers(&self, request: &RxGuardRequest) -> Option<BaselineAnswers> {
        if !request.include_baseline_answer {
            return None;
        }
        let question = &request.question;
        let selector = request.baseline_selector.unwrap_or(BaselineSelector::Both);
        let answers = match selector {
            BaselineSelector::A => BaselineAnswers {
                model_a: Some(answer_or_diagnostic(self.baseline_a.as_ref(), question).await),
                model_b: None,
            },
            BaselineSelector::B => BaselineAnswers {
                model_a: None,
                model_b: Some(answer_or_diagnostic(self.baseline_b.as_ref(), question).await),
            },
            BaselineSelector::Both => {
                let (a, b) = futures::join!(
                    answer_or_diagnostic(self.baseline_a.as_ref(), question),
                    answer_or_diagnostic(self.baseline_b.as_ref(), question),
                );
                BaselineAnswers {
                    model_a: Some(a),
                    model_b: Some(b),
                }
            }
        };
        Some(answers)
    }
}

fn clarify_response(
    message: String,
    clarifying_question: String,
    rules_triggered: Vec<String>,
    label_doc_id: Option<String>,
) -> RxGuardResponse {
    RxGuardResponse {
        decision: Decision::Clarify,
        risk: Risk::Unknown,
        message: format!("{message}\n\n{DISCLAIMER}"),
        clarifying_question: Some(clarifying_question),
        proof_card: None,
        baseline: None,
        debug: Some(DebugInfo {
            resolved_drug: None,
            rules_triggered,
            label_doc_id,
        }),
    }
}

fn compose_message(
    name: &str,
    policy: &rxguard_policy::PolicyResult,
    card: &rxguard_core::ProofCard,
) -> String {
    let headline = match policy.decision {
        Decision::Block => format!(
            "Hold off on {name}: the label raises {} risk flags. Talk to a pharmacist or clinician first.",
            policy.risk.as_str()
        ),
        Decision::Caution => format!(
            "Use {name} carefully: the label carries cautions worth reading."
        ),
        Decision::Info => format!("No high-risk flags found on the {name} label."),
        Decision::Clarify => format!("I need more detail before weighing in on {name}."),
    };

    let mut parts = vec![headline];
    for quote in card.quotes.iter().take(MAX_MESSAGE_SNIPPETS) {
        parts.push(format!(
            "[{}] \"{}\"",
            quote.section,
            truncate_chars(&quote.quote, SNIPPET_LEN)
        ));
    }
    parts.push(DISCLAIMER.to_string());
    parts.join("\n\n")
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}…")
}
