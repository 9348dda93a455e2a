//! Rule evaluation: fixed rule pass, profile-conditional upgrades,
//! interaction cross-check, and the decision mapping.

use serde::Serialize;

use rxguard_core::{Decision, EvidenceQuote, LabelSection, LabelSnapshot, Risk, RxGuardProfile};
use tracing::debug;

use crate::rules::{ANTICOAGULANTS, LabelRule, RENAL_KEYWORDS, RULES, RuleTarget};

/// Characters kept on each side of a pattern match when extracting a quote.
const QUOTE_RADIUS: usize = 120;

/// At most this many verbatim interaction quotes are produced.
const MAX_INTERACTION_QUOTES: usize = 3;

/// Fallback quote length when a BLOCK/CAUTION has no rule-derived quotes.
const FALLBACK_QUOTE_LEN: usize = 240;

/// Section label used for quotes drawn from the whole canonical text.
const WHOLE_LABEL: &str = "label";

pub const UPGRADE_ANTICOAGULANT: &str = "bleeding_risk+anticoagulant";
pub const UPGRADE_RENAL: &str = "renal_risk+renal_condition";
pub const RULE_INTERACTION_HIT: &str = "interaction_hit";

pub const CLARIFY_QUESTION: &str = "Could you share the exact product name and strength, \
any medical conditions you have, and the other medicines you take?";

/// Outcome of one policy evaluation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResult {
    pub decision: Decision,
    pub risk: Risk,
    pub rules_triggered: Vec<String>,
    pub quotes: Vec<EvidenceQuote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarifying_question: Option<String>,
}

/// Evaluate the fixed rule set against a snapshot.
///
/// Deterministic: the same snapshot, profile, and medication list always
/// produce the same result, with rules recorded in table order.
///
/// Non-empty evidence starts at LOW risk and rules only raise it, so a
/// clean label maps to INFO; UNKNOWN is reserved for missing evidence.
pub fn evaluate(
    snapshot: &LabelSnapshot,
    profile: Option<&RxGuardProfile>,
    other_meds: &[String],
) -> PolicyResult {
    // Absence of evidence is never treated as safety.
    if snapshot.evidence_text.trim().is_empty() {
        return PolicyResult {
            decision: Decision::Clarify,
            risk: Risk::Unknown,
            rules_triggered: Vec::new(),
            quotes: Vec::new(),
            clarifying_question: Some(CLARIFY_QUESTION.to_string()),
        };
    }

    let mut risk = Risk::Low;
    let mut rules_triggered = Vec::new();
    let mut quotes = Vec::new();

    // Pass 1: fixed ordered label-text rules.
    for rule in RULES {
        if rule.pregnancy_gated && !pregnancy_gate_open(profile) {
            continue;
        }
        let Some(text) = rule_text(snapshot, rule.target) else {
            continue;
        };
        let Some(hit) = match_rule(rule, text) else {
            continue;
        };

        debug!(rule = rule.id, severity = rule.severity.as_str(), "rule fired");
        risk = risk.combine(rule.severity);
        rules_triggered.push(rule.id.to_string());
        quotes.push(EvidenceQuote {
            section: target_label(rule.target).to_string(),
            quote: quote_window(text, hit.start, hit.end),
            reason: Some(rule.reason.to_string()),
        });
    }

    // Pass 2: profile-conditional upgrades.
    if let Some(profile) = profile {
        if rules_triggered.iter().any(|r| r == "bleeding_risk")
            && profile
                .current_meds
                .iter()
                .any(|m| contains_keyword(m, ANTICOAGULANTS))
        {
            risk = Risk::High;
            rules_triggered.push(UPGRADE_ANTICOAGULANT.to_string());
        }
        if rules_triggered.iter().any(|r| r == "renal_risk")
            && profile
                .conditions
                .iter()
                .any(|c| contains_keyword(c, RENAL_KEYWORDS))
        {
            risk = Risk::High;
            rules_triggered.push(UPGRADE_RENAL.to_string());
        }
    }

    // Pass 3: interaction cross-check against the caller's medication list.
    let interaction_quotes = interaction_hits(snapshot, other_meds);
    if !interaction_quotes.is_empty() {
        risk = Risk::High;
        rules_triggered.push(RULE_INTERACTION_HIT.to_string());
        quotes.extend(interaction_quotes);
    }

    // Decision mapping.
    let (decision, clarifying_question) = match risk {
        Risk::High => (Decision::Block, None),
        Risk::Moderate => (Decision::Caution, None),
        Risk::Low => (Decision::Info, None),
        Risk::Unknown => (Decision::Clarify, Some(CLARIFY_QUESTION.to_string())),
    };

    // A blocking or cautioning answer must cite something.
    if matches!(decision, Decision::Block | Decision::Caution) && quotes.is_empty() {
        quotes.push(EvidenceQuote {
            section: WHOLE_LABEL.to_string(),
            quote: evidence_prefix(&snapshot.evidence_text),
            reason: Some("General label excerpt".to_string()),
        });
    }

    PolicyResult {
        decision,
        risk,
        rules_triggered,
        quotes,
        clarifying_question,
    }
}

struct MatchSpan {
    start: usize,
    end: usize,
}

fn pregnancy_gate_open(profile: Option<&RxGuardProfile>) -> bool {
    profile
        .and_then(|p| p.pregnancy)
        .is_some_and(|p| p.pregnant_or_trying())
}

fn rule_text(snapshot: &LabelSnapshot, target: RuleTarget) -> Option<&str> {
    let text = match target {
        RuleTarget::Section(section) => snapshot.sections.get(&section)?.as_str(),
        RuleTarget::WholeLabel => snapshot.evidence_text.as_str(),
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn target_label(target: RuleTarget) -> &'static str {
    match target {
        RuleTarget::Section(section) => section.api_field(),
        RuleTarget::WholeLabel => WHOLE_LABEL,
    }
}

/// First pattern match in the target text, or a zero-width match at the
/// start for presence rules (empty pattern list).
fn match_rule(rule: &LabelRule, text: &str) -> Option<MatchSpan> {
    if rule.patterns.is_empty() {
        return Some(MatchSpan { start: 0, end: 0 });
    }
    // ASCII lowering preserves byte offsets into the original text.
    let haystack = text.to_ascii_lowercase();
    rule.patterns
        .iter()
        .filter_map(|p| haystack.find(p).map(|start| (start, start + p.len())))
        .min_by_key(|(start, _)| *start)
        .map(|(start, end)| MatchSpan { start, end })
}

/// Verbatim quotes for caller medications named in the interactions section.
///
/// Case/space-normalized substring search; quotes are cut from the original
/// section text around the match, one per distinct medication, in input
/// order, capped at [`MAX_INTERACTION_QUOTES`].
fn interaction_hits(snapshot: &LabelSnapshot, other_meds: &[String]) -> Vec<EvidenceQuote> {
    let Some(section_text) = snapshot.sections.get(&LabelSection::DrugInteractions) else {
        return Vec::new();
    };
    let haystack = section_text.to_ascii_lowercase();

    let mut seen = std::collections::HashSet::new();
    let mut quotes = Vec::new();
    for med in other_meds {
        if quotes.len() >= MAX_INTERACTION_QUOTES {
            break;
        }
        let needle = normalize_med_name(med);
        if needle.is_empty() || !seen.insert(needle.clone()) {
            continue;
        }
        if let Some(start) = haystack.find(&needle) {
            quotes.push(EvidenceQuote {
                section: LabelSection::DrugInteractions.api_field().to_string(),
                quote: quote_window(section_text, start, start + needle.len()),
                reason: Some(format!("Interaction text mentions \"{}\"", med.trim())),
            });
        }
    }
    quotes
}

/// Lowercase and collapse internal whitespace; canonical section text is
/// already single-spaced, so offsets found with this needle are valid in the
/// original.
fn normalize_med_name(med: &str) -> String {
    med.to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn contains_keyword(value: &str, keywords: &[&str]) -> bool {
    let normalized = normalize_med_name(value);
    keywords.iter().any(|k| normalized.contains(k))
}

/// Bounded text window around a match span, cut on char boundaries.
fn quote_window(text: &str, start: usize, end: usize) -> String {
    let from = floor_boundary(text, start.saturating_sub(QUOTE_RADIUS));
    let to = ceil_boundary(text, end.saturating_add(QUOTE_RADIUS));
    text[from..to].trim().to_string()
}

/// Bounded prefix of the evidence text, used as the fallback quote.
fn evidence_prefix(text: &str) -> String {
    let to = ceil_boundary(text, FALLBACK_QUOTE_LEN);
    text[..to].trim().to_string()
}

fn floor_boundary(text: &str, mut i: usize) -> usize {
    i = i.min(text.len());
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(text: &str, mut i: usize) -> usize {
    i = i.min(text.len());
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxguard_core::{LabelRecord, OpenFdaNames, PregnancyStatus, SectionText};

    fn snapshot_with(build: impl FnOnce(&mut LabelRecord)) -> LabelSnapshot {
        let mut record = LabelRecord {
            set_id: Some("set-1".into()),
            effective_time: Some("20240101".into()),
            openfda: OpenFdaNames {
                brand_name: vec!["TestBrand".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        build(&mut record);
        LabelSnapshot::from_record(&record).unwrap()
    }

    fn profile_with(build: impl FnOnce(&mut RxGuardProfile)) -> RxGuardProfile {
        let mut profile = RxGuardProfile::default();
        build(&mut profile);
        profile
    }

    #[test]
    fn boxed_warning_blocks() {
        let snap = snapshot_with(|r| {
            r.boxed_warning = Some(SectionText::One("Serious cardiovascular events.".into()));
        });
        let result = evaluate(&snap, None, &[]);
        assert!(result.rules_triggered.contains(&"boxed_warning".to_string()));
        assert_eq!(result.risk, Risk::High);
        assert_eq!(result.decision, Decision::Block);
        assert!(!result.quotes.is_empty());
    }

    #[test]
    fn warfarin_interaction_blocks_with_section_quote() {
        let snap = snapshot_with(|r| {
            r.drug_interactions = Some(SectionText::One(
                "Do not combine with WARFARIN or other blood thinners.".into(),
            ));
        });
        let result = evaluate(&snap, None, &["Warfarin".to_string()]);
        assert!(result.rules_triggered.contains(&RULE_INTERACTION_HIT.to_string()));
        assert_eq!(result.risk, Risk::High);
        assert_eq!(result.decision, Decision::Block);
        assert!(
            result
                .quotes
                .iter()
                .any(|q| q.section == "drug_interactions" && q.quote.contains("WARFARIN"))
        );
    }

    #[test]
    fn interaction_quotes_are_bounded_and_deduplicated() {
        let snap = snapshot_with(|r| {
            r.drug_interactions = Some(SectionText::One(
                "Interacts with warfarin, aspirin, lithium, methotrexate, and ibuprofen.".into(),
            ));
        });
        let meds = vec![
            "warfarin".to_string(),
            "WARFARIN ".to_string(),
            "aspirin".to_string(),
            "lithium".to_string(),
            "methotrexate".to_string(),
        ];
        let result = evaluate(&snap, None, &meds);
        let interaction_quotes: Vec<_> = result
            .quotes
            .iter()
            .filter(|q| {
                q.reason
                    .as_deref()
                    .is_some_and(|r| r.starts_with("Interaction text mentions"))
            })
            .collect();
        assert_eq!(interaction_quotes.len(), MAX_INTERACTION_QUOTES);
        // warfarin counted once despite appearing twice in the input list.
        assert_eq!(
            interaction_quotes
                .iter()
                .filter(|q| q.reason.as_deref().unwrap().contains("warfarin"))
                .count(),
            1
        );
    }

    #[test]
    fn pregnancy_rule_is_gated_on_profile() {
        let snap = snapshot_with(|r| {
            r.pregnancy = Some(SectionText::One(
                "If pregnant or breast-feeding, ask a health professional before use.".into(),
            ));
        });

        let silent = evaluate(&snap, None, &[]);
        assert!(!silent.rules_triggered.contains(&"pregnancy_risk".to_string()));

        let not_pregnant = profile_with(|p| p.pregnancy = Some(PregnancyStatus::NotPregnant));
        let silent = evaluate(&snap, Some(&not_pregnant), &[]);
        assert!(!silent.rules_triggered.contains(&"pregnancy_risk".to_string()));

        let trying = profile_with(|p| p.pregnancy = Some(PregnancyStatus::Trying));
        let fired = evaluate(&snap, Some(&trying), &[]);
        assert!(fired.rules_triggered.contains(&"pregnancy_risk".to_string()));
        assert_eq!(fired.risk, Risk::High);
    }

    #[test]
    fn anticoagulant_upgrade_requires_bleeding_rule() {
        let snap = snapshot_with(|r| {
            r.warnings = Some(SectionText::One(
                "Stomach bleeding warning: this product may cause severe stomach bleeding.".into(),
            ));
        });
        let profile = profile_with(|p| p.current_meds = vec!["warfarin 5mg".into()]);
        let result = evaluate(&snap, Some(&profile), &[]);
        assert!(result.rules_triggered.contains(&"bleeding_risk".to_string()));
        assert!(result.rules_triggered.contains(&UPGRADE_ANTICOAGULANT.to_string()));
        assert_eq!(result.risk, Risk::High);
        assert_eq!(result.decision, Decision::Block);

        // No bleeding language on the label: the upgrade never applies.
        let snap = snapshot_with(|r| {
            r.warnings = Some(SectionText::One("May cause drowsiness.".into()));
        });
        let result = evaluate(&snap, Some(&profile), &[]);
        assert!(!result.rules_triggered.contains(&UPGRADE_ANTICOAGULANT.to_string()));
    }

    #[test]
    fn renal_upgrade_requires_renal_rule_and_condition() {
        let snap = snapshot_with(|r| {
            r.warnings = Some(SectionText::One(
                "Ask a doctor before use if you have kidney disease.".into(),
            ));
        });
        let profile = profile_with(|p| p.conditions = vec!["CKD stage 3".into()]);
        let result = evaluate(&snap, Some(&profile), &[]);
        assert!(result.rules_triggered.contains(&"renal_risk".to_string()));
        assert!(result.rules_triggered.contains(&UPGRADE_RENAL.to_string()));
        assert_eq!(result.risk, Risk::High);

        let unrelated = profile_with(|p| p.conditions = vec!["asthma".into()]);
        let result = evaluate(&snap, Some(&unrelated), &[]);
        assert!(!result.rules_triggered.contains(&UPGRADE_RENAL.to_string()));
        assert_eq!(result.risk, Risk::Moderate);
    }

    #[test]
    fn clean_label_is_info_low() {
        let snap = snapshot_with(|r| {
            r.warnings = Some(SectionText::One(
                "May cause drowsiness. Avoid alcohol while taking this product.".into(),
            ));
        });
        let result = evaluate(&snap, None, &[]);
        assert_eq!(result.risk, Risk::Low);
        assert_eq!(result.decision, Decision::Info);
        assert!(result.rules_triggered.is_empty());
        assert!(result.clarifying_question.is_none());
    }

    #[test]
    fn empty_evidence_forces_clarify_unknown() {
        let snap = snapshot_with(|_| {});
        assert!(snap.evidence_text.is_empty());
        let profile = profile_with(|p| p.current_meds = vec!["warfarin".into()]);
        let result = evaluate(&snap, Some(&profile), &["warfarin".to_string()]);
        assert_eq!(result.decision, Decision::Clarify);
        assert_eq!(result.risk, Risk::Unknown);
        assert!(result.rules_triggered.is_empty());
        assert!(result.clarifying_question.is_some());
    }

    #[test]
    fn caution_always_has_a_quote() {
        let snap = snapshot_with(|r| {
            r.contraindications = Some(SectionText::One("Known hypersensitivity.".into()));
        });
        let result = evaluate(&snap, None, &[]);
        assert_eq!(result.decision, Decision::Caution);
        assert!(!result.quotes.is_empty());
    }

    #[test]
    fn rules_record_in_table_order() {
        let snap = snapshot_with(|r| {
            r.boxed_warning = Some(SectionText::One("Boxed.".into()));
            r.contraindications = Some(SectionText::One("Contra.".into()));
            r.drug_interactions = Some(SectionText::One("Interactions.".into()));
        });
        let result = evaluate(&snap, None, &[]);
        assert_eq!(
            result.rules_triggered,
            vec!["boxed_warning", "contraindications", "interaction_section"]
        );
    }

    #[test]
    fn quote_window_is_bounded_and_char_safe() {
        let text = "é".repeat(600);
        let quote = quote_window(&text, 300, 302);
        assert!(quote.len() <= 2 * QUOTE_RADIUS + 8);
        assert!(!quote.is_empty());
    }

    #[test]
    fn evidence_prefix_is_bounded() {
        let text = "word ".repeat(200);
        let prefix = evidence_prefix(&text);
        assert!(prefix.len() <= FALLBACK_QUOTE_LEN);
        assert!(text.starts_with(prefix.trim_end()));
    }
}
