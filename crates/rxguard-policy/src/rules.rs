//! The fixed ordered rule table and upgrade keyword lists.

use rxguard_core::{LabelSection, Risk};

/// What part of the snapshot a rule matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTarget {
    Section(LabelSection),
    WholeLabel,
}

/// One label-text rule.
///
/// Empty `patterns` means the rule fires on any non-empty target text.
/// Patterns are lowercase and matched case-insensitively.
#[derive(Debug, Clone, Copy)]
pub struct LabelRule {
    pub id: &'static str,
    pub target: RuleTarget,
    pub patterns: &'static [&'static str],
    pub reason: &'static str,
    pub severity: Risk,
    /// Only fires when the profile reports pregnant-or-trying.
    pub pregnancy_gated: bool,
}

/// Fixed evaluation order. Order matters for the triggered-rule list and for
/// which quote a shared text window produces first; never reorder casually.
pub const RULES: &[LabelRule] = &[
    LabelRule {
        id: "boxed_warning",
        target: RuleTarget::Section(LabelSection::BoxedWarning),
        patterns: &[],
        reason: "Label carries a boxed warning",
        severity: Risk::High,
        pregnancy_gated: false,
    },
    LabelRule {
        id: "do_not_use",
        target: RuleTarget::Section(LabelSection::DoNotUse),
        patterns: &[],
        reason: "Label lists do-not-use conditions",
        severity: Risk::High,
        pregnancy_gated: false,
    },
    LabelRule {
        id: "contraindications",
        target: RuleTarget::Section(LabelSection::Contraindications),
        patterns: &[],
        reason: "Label lists contraindications",
        severity: Risk::Moderate,
        pregnancy_gated: false,
    },
    LabelRule {
        id: "pregnancy_risk",
        target: RuleTarget::WholeLabel,
        patterns: &["pregnan", "birth defect", "fetal harm"],
        reason: "Label carries pregnancy-risk language",
        severity: Risk::High,
        pregnancy_gated: true,
    },
    LabelRule {
        id: "bleeding_risk",
        target: RuleTarget::WholeLabel,
        patterns: &["bleed", "hemorrhag"],
        reason: "Label warns about bleeding risk",
        severity: Risk::Moderate,
        pregnancy_gated: false,
    },
    LabelRule {
        id: "renal_risk",
        target: RuleTarget::WholeLabel,
        patterns: &["kidney", "renal"],
        reason: "Label warns about kidney involvement",
        severity: Risk::Moderate,
        pregnancy_gated: false,
    },
    LabelRule {
        id: "interaction_section",
        target: RuleTarget::Section(LabelSection::DrugInteractions),
        patterns: &[],
        reason: "Label lists drug interactions",
        severity: Risk::Moderate,
        pregnancy_gated: false,
    },
];

/// Known anticoagulant / antiplatelet medication names (lowercase).
pub const ANTICOAGULANTS: &[&str] = &[
    "warfarin",
    "apixaban",
    "rivaroxaban",
    "dabigatran",
    "edoxaban",
    "heparin",
    "enoxaparin",
    "clopidogrel",
];

/// Renal-condition keywords matched against profile conditions (lowercase).
pub const RENAL_KEYWORDS: &[&str] = &["kidney", "renal", "ckd"];
