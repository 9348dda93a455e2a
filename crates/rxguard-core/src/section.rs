//! Closed set of drug-label sections used as the evidence substrate.
//!
//! Every section the extractor reads from a label record is enumerated here;
//! there is no lookup by arbitrary string key. The variant order is the
//! canonical concatenation order for evidence text, so hashes and substring
//! offsets are stable across runs.

use serde::{Deserialize, Serialize};

/// A labeled section of a regulatory drug-label record.
///
/// Serialized as the upstream API field name (`snake_case`), which is also
/// the key used in persisted snapshot JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSection {
    ActiveIngredient,
    BoxedWarning,
    Contraindications,
    Warnings,
    WarningsAndCautions,
    DrugInteractions,
    Pregnancy,
    Lactation,
    PediatricUse,
    GeriatricUse,
    DoNotUse,
    AskDoctor,
}

impl LabelSection {
    /// All sections in canonical evidence order.
    pub const ALL: [LabelSection; 12] = [
        LabelSection::ActiveIngredient,
        LabelSection::BoxedWarning,
        LabelSection::Contraindications,
        LabelSection::Warnings,
        LabelSection::WarningsAndCautions,
        LabelSection::DrugInteractions,
        LabelSection::Pregnancy,
        LabelSection::Lactation,
        LabelSection::PediatricUse,
        LabelSection::GeriatricUse,
        LabelSection::DoNotUse,
        LabelSection::AskDoctor,
    ];

    /// Upstream API field name for this section.
    pub fn api_field(&self) -> &'static str {
        match self {
            Self::ActiveIngredient => "active_ingredient",
            Self::BoxedWarning => "boxed_warning",
            Self::Contraindications => "contraindications",
            Self::Warnings => "warnings",
            Self::WarningsAndCautions => "warnings_and_cautions",
            Self::DrugInteractions => "drug_interactions",
            Self::Pregnancy => "pregnancy",
            Self::Lactation => "lactation",
            Self::PediatricUse => "pediatric_use",
            Self::GeriatricUse => "geriatric_use",
            Self::DoNotUse => "do_not_use",
            Self::AskDoctor => "ask_doctor",
        }
    }

    /// Uppercase header line prefixed to this section in canonical evidence text.
    pub fn header(&self) -> &'static str {
        match self {
            Self::ActiveIngredient => "ACTIVE INGREDIENT",
            Self::BoxedWarning => "BOXED WARNING",
            Self::Contraindications => "CONTRAINDICATIONS",
            Self::Warnings => "WARNINGS",
            Self::WarningsAndCautions => "WARNINGS AND CAUTIONS",
            Self::DrugInteractions => "DRUG INTERACTIONS",
            Self::Pregnancy => "PREGNANCY",
            Self::Lactation => "LACTATION",
            Self::PediatricUse => "PEDIATRIC USE",
            Self::GeriatricUse => "GERIATRIC USE",
            Self::DoNotUse => "DO NOT USE",
            Self::AskDoctor => "ASK A DOCTOR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_covers_every_variant_once() {
        let mut seen = std::collections::HashSet::new();
        for s in LabelSection::ALL {
            assert!(seen.insert(s.api_field()), "duplicate section {:?}", s);
        }
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn canonical_order_is_variant_order() {
        for pair in LabelSection::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn serde_uses_api_field_names() {
        let json = serde_json::to_string(&LabelSection::BoxedWarning).unwrap();
        assert_eq!(json, "\"boxed_warning\"");
        let parsed: LabelSection = serde_json::from_str("\"ask_doctor\"").unwrap();
        assert_eq!(parsed, LabelSection::AskDoctor);
    }

    #[test]
    fn headers_are_uppercase() {
        for s in LabelSection::ALL {
            assert_eq!(s.header(), s.header().to_uppercase());
        }
    }
}
