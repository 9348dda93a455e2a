//! Vertical card display for answers.
//!
//! Renders a response as a grouped, human-readable card: verdict, message,
//! verified evidence, provenance, and optional baseline answers.

use rxguard_service::RxGuardResponse;

const MAX_QUOTE_CHARS: usize = 280;
const WRAP_WIDTH: usize = 78;

/// Render a response as a vertical card grouped by section.
pub fn render(response: &RxGuardResponse) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== {} (risk {}) ===\n\n",
        response.decision.as_str(),
        response.risk.as_str()
    ));

    for line in wrap(&response.message, WRAP_WIDTH) {
        out.push_str(&line);
        out.push('\n');
    }

    if let Some(question) = &response.clarifying_question {
        out.push_str("\nNeeded from you\n");
        for line in wrap(question, WRAP_WIDTH) {
            out.push_str(&format!("  {line}\n"));
        }
    }

    if let Some(card) = &response.proof_card {
        if !card.quotes.is_empty() {
            out.push_str("\nVerified evidence\n");
            for quote in &card.quotes {
                out.push_str(&format!(
                    "  [{}] \"{}\"\n",
                    quote.section,
                    truncate(&quote.quote, MAX_QUOTE_CHARS)
                ));
            }
        }
        out.push_str("\nProvenance\n");
        out.push_str(&format!("  {:<16} {}\n", "source", card.source));
        out.push_str(&format!("  {:<16} {}\n", "set_id", card.set_id));
        out.push_str(&format!("  {:<16} {}\n", "effective_time", card.effective_time));
        out.push_str(&format!("  {:<16} {}\n", "evidence_hash", card.evidence_hash));
    }

    if let Some(baseline) = &response.baseline {
        out.push_str("\nBaseline comparison (ungated, for contrast only)\n");
        if let Some(a) = &baseline.model_a {
            out.push_str(&format!("  model A: {}\n", truncate(a, MAX_QUOTE_CHARS)));
        }
        if let Some(b) = &baseline.model_b {
            out.push_str(&format!("  model B: {}\n", truncate(b, MAX_QUOTE_CHARS)));
        }
    }

    if let Some(debug) = &response.debug
        && !debug.rules_triggered.is_empty()
    {
        out.push_str(&format!(
            "\nRules triggered: {}\n",
            debug.rules_triggered.join(", ")
        ));
    }

    out
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}…")
}

/// Greedy word wrap; existing newlines are preserved.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxguard_core::{Decision, EvidenceQuote, ProofCard, Risk};
    use rxguard_service::{BaselineAnswers, DebugInfo};

    fn response() -> RxGuardResponse {
        RxGuardResponse {
            decision: Decision::Block,
            risk: Risk::High,
            message: "Hold off on Brand-a.".into(),
            clarifying_question: None,
            proof_card: Some(ProofCard {
                source: "openFDA drug label".into(),
                set_id: "set-a".into(),
                effective_time: "20240101".into(),
                evidence_hash: "abc123".into(),
                quotes: vec![EvidenceQuote {
                    section: "boxed_warning".into(),
                    quote: "Serious risk.".into(),
                    reason: None,
                }],
            }),
            baseline: Some(BaselineAnswers {
                model_a: Some("Probably fine.".into()),
                model_b: None,
            }),
            debug: Some(DebugInfo {
                resolved_drug: Some("Brand-a".into()),
                rules_triggered: vec!["boxed_warning".into()],
                label_doc_id: Some("set-a_20240101".into()),
            }),
        }
    }

    #[test]
    fn card_contains_every_section() {
        let card = render(&response());
        assert!(card.contains("=== BLOCK (risk HIGH) ==="));
        assert!(card.contains("Verified evidence"));
        assert!(card.contains("[boxed_warning]"));
        assert!(card.contains("evidence_hash"));
        assert!(card.contains("model A: Probably fine."));
        assert!(card.contains("Rules triggered: boxed_warning"));
    }

    #[test]
    fn wrap_respects_width() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        for line in wrap(text, 20) {
            assert!(line.chars().count() <= 20, "line too long: {line}");
        }
    }

    #[test]
    fn wrap_preserves_paragraph_breaks() {
        let lines = wrap("one\n\ntwo", 20);
        assert_eq!(lines, vec!["one", "", "two"]);
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("short", 10), "short");
        assert!(truncate(&"x".repeat(500), 10).ends_with('…'));
    }
}
