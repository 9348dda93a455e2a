//! Deterministic, explainable safety classification over pinned snapshots.
//!
//! The rule table is intentionally conservative, non-clinical substring and
//! presence matching: it will both over-flag and under-flag relative to real
//! clinical risk, biasing toward caution.

pub mod engine;
pub mod proof;
pub mod rules;

pub use engine::{CLARIFY_QUESTION, PolicyResult, evaluate};
pub use proof::{PROOF_SOURCE, build_proof_card, normalize_for_match};
pub use rules::{LabelRule, RULES, RuleTarget};
