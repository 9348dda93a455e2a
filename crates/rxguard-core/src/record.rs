//! Typed schema boundary for raw label records from the upstream API.
//!
//! External JSON is deserialized into these structs before any field is
//! consumed downstream; unknown keys are ignored, known keys are typed.

use serde::Deserialize;

use crate::section::LabelSection;

/// Section text as the upstream API ships it: a bare string or a list of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SectionText {
    One(String),
    Many(Vec<String>),
}

impl SectionText {
    /// Join list entries with newlines; a bare string passes through.
    pub fn joined(&self) -> String {
        match self {
            Self::One(s) => s.clone(),
            Self::Many(items) => items.join("\n"),
        }
    }
}

/// Name metadata nested under the upstream `openfda` key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenFdaNames {
    #[serde(default)]
    pub brand_name: Vec<String>,
    #[serde(default)]
    pub generic_name: Vec<String>,
    #[serde(default)]
    pub substance_name: Vec<String>,
}

/// One raw drug-label record as returned by the label source.
///
/// Identity fields (`set_id`, `effective_time`) and names are optional at
/// this boundary; snapshot construction enforces what must be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelRecord {
    pub id: Option<String>,
    pub set_id: Option<String>,
    pub effective_time: Option<String>,
    #[serde(default)]
    pub openfda: OpenFdaNames,
    pub active_ingredient: Option<SectionText>,
    pub boxed_warning: Option<SectionText>,
    pub contraindications: Option<SectionText>,
    pub warnings: Option<SectionText>,
    pub warnings_and_cautions: Option<SectionText>,
    pub drug_interactions: Option<SectionText>,
    pub pregnancy: Option<SectionText>,
    pub lactation: Option<SectionText>,
    pub pediatric_use: Option<SectionText>,
    pub geriatric_use: Option<SectionText>,
    pub do_not_use: Option<SectionText>,
    pub ask_doctor: Option<SectionText>,
}

impl LabelRecord {
    /// Raw text for one of the closed set of sections, if present.
    pub fn section(&self, section: LabelSection) -> Option<&SectionText> {
        match section {
            LabelSection::ActiveIngredient => self.active_ingredient.as_ref(),
            LabelSection::BoxedWarning => self.boxed_warning.as_ref(),
            LabelSection::Contraindications => self.contraindications.as_ref(),
            LabelSection::Warnings => self.warnings.as_ref(),
            LabelSection::WarningsAndCautions => self.warnings_and_cautions.as_ref(),
            LabelSection::DrugInteractions => self.drug_interactions.as_ref(),
            LabelSection::Pregnancy => self.pregnancy.as_ref(),
            LabelSection::Lactation => self.lactation.as_ref(),
            LabelSection::PediatricUse => self.pediatric_use.as_ref(),
            LabelSection::GeriatricUse => self.geriatric_use.as_ref(),
            LabelSection::DoNotUse => self.do_not_use.as_ref(),
            LabelSection::AskDoctor => self.ask_doctor.as_ref(),
        }
    }

    /// Stable identifier used for tie-breaking: `id`, falling back to `set_id`.
    pub fn stable_id(&self) -> &str {
        self.id
            .as_deref()
            .or(self.set_id.as_deref())
            .unwrap_or("")
    }

    /// Effective time parsed as a number; non-numeric or missing sorts as 0.
    pub fn effective_time_num(&self) -> u64 {
        self.effective_time
            .as_deref()
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Normalized, sorted, deduplicated active-ingredient set.
    ///
    /// Records with the same key are the same formulation for ambiguity
    /// detection purposes.
    pub fn ingredient_key(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .openfda
            .substance_name
            .iter()
            .map(|n| n.trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
