//! Evidence quotes and the verifiable proof card.

use serde::{Deserialize, Serialize};

/// A candidate quote extracted from label text.
///
/// Candidates are unverified; only quotes proven to be literal substrings of
/// the canonical evidence text survive into a [`ProofCard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceQuote {
    /// Section label the quote was taken from (`"label"` for whole-text quotes).
    pub section: String,
    pub quote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Verifiable evidence bundle attached to a decision.
///
/// Carries the snapshot identity and hash so a consumer can independently
/// re-fetch the record and re-verify every quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofCard {
    /// Fixed provenance tag for the evidence source.
    pub source: String,
    pub set_id: String,
    pub effective_time: String,
    pub evidence_hash: String,
    pub quotes: Vec<EvidenceQuote>,
}
