//! Proof-card construction: only quotes verifiably present in the canonical
//! evidence text survive.

use rxguard_core::{EvidenceQuote, LabelSnapshot, ProofCard};
use tracing::debug;

/// Fixed provenance tag carried by every proof card.
pub const PROOF_SOURCE: &str = "openFDA drug label";

/// Case/space normalization used for substring verification: lowercase with
/// all whitespace removed, so extraction-window trimming cannot defeat a
/// legitimate quote.
pub fn normalize_for_match(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Filter candidate quotes down to those whose normalized text is a
/// substring of the snapshot's normalized evidence text.
///
/// Failing quotes are dropped silently; they are extraction artifacts, not
/// errors. The card carries the snapshot identity and hash so provenance can
/// be re-verified independently.
pub fn build_proof_card(snapshot: &LabelSnapshot, candidates: &[EvidenceQuote]) -> ProofCard {
    let haystack = normalize_for_match(&snapshot.evidence_text);
    let quotes: Vec<EvidenceQuote> = candidates
        .iter()
        .filter(|quote| {
            let needle = normalize_for_match(&quote.quote);
            let keep = !needle.is_empty() && haystack.contains(&needle);
            if !keep {
                debug!(section = %quote.section, "dropping unverifiable quote");
            }
            keep
        })
        .cloned()
        .collect();

    ProofCard {
        source: PROOF_SOURCE.to_string(),
        set_id: snapshot.set_id.clone(),
        effective_time: snapshot.effective_time.clone(),
        evidence_hash: snapshot.evidence_hash.clone(),
        quotes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxguard_core::{LabelRecord, SectionText};

    fn snapshot() -> LabelSnapshot {
        let record = LabelRecord {
            set_id: Some("set-1".into()),
            effective_time: Some("20240101".into()),
            warnings: Some(SectionText::One(
                "Stomach bleeding warning: this product contains an NSAID.".into(),
            )),
            ..Default::default()
        };
        LabelSnapshot::from_record(&record).unwrap()
    }

    fn quote(text: &str) -> EvidenceQuote {
        EvidenceQuote {
            section: "warnings".into(),
            quote: text.into(),
            reason: None,
        }
    }

    #[test]
    fn verbatim_quote_survives() {
        let snap = snapshot();
        let card = build_proof_card(&snap, &[quote("Stomach bleeding warning")]);
        assert_eq!(card.quotes.len(), 1);
        assert_eq!(card.set_id, "set-1");
        assert_eq!(card.evidence_hash, snap.evidence_hash);
        assert_eq!(card.source, PROOF_SOURCE);
    }

    #[test]
    fn case_and_spacing_differences_still_verify() {
        let snap = snapshot();
        let card = build_proof_card(&snap, &[quote("stomach  BLEEDING\nwarning")]);
        assert_eq!(card.quotes.len(), 1);
    }

    #[test]
    fn fabricated_quote_is_dropped_silently() {
        let snap = snapshot();
        let card = build_proof_card(
            &snap,
            &[
                quote("this text is not on the label"),
                quote("contains an NSAID"),
            ],
        );
        assert_eq!(card.quotes.len(), 1);
        assert!(card.quotes[0].quote.contains("NSAID"));
    }

    #[test]
    fn empty_quote_is_dropped() {
        let snap = snapshot();
        let card = build_proof_card(&snap, &[quote("   ")]);
        assert!(card.quotes.is_empty());
    }

    #[test]
    fn every_surviving_quote_is_substring_of_normalized_evidence() {
        let snap = snapshot();
        let candidates = [
            quote("Stomach bleeding"),
            quote("NSAID."),
            quote("made up entirely"),
        ];
        let card = build_proof_card(&snap, &candidates);
        let haystack = normalize_for_match(&snap.evidence_text);
        for q in &card.quotes {
            assert!(haystack.contains(&normalize_for_match(&q.quote)));
        }
        assert_eq!(card.quotes.len(), 2);
    }
}
