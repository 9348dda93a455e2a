//! Resolution outcomes for a drug-name query.

use serde::{Deserialize, Serialize};

use crate::snapshot::LabelSnapshot;

/// One distinguishable formulation shown to the caller on an ambiguous query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulationOption {
    pub set_id: String,
    pub brand_names: Vec<String>,
    pub generic_names: Vec<String>,
    pub active_ingredients: Vec<String>,
}

impl FormulationOption {
    /// Short human-readable summary: names plus ingredient list.
    pub fn summary(&self) -> String {
        let name = self
            .brand_names
            .first()
            .or(self.generic_names.first())
            .map(String::as_str)
            .unwrap_or("(unnamed)");
        if self.active_ingredients.is_empty() {
            name.to_string()
        } else {
            format!("{} ({})", name, self.active_ingredients.join(", "))
        }
    }
}

/// Result of resolving a free-text query against the label source.
#[derive(Debug, Clone)]
pub enum ResolutionOutcome {
    /// Exactly one canonical record was pinned (or found already pinned).
    Resolved(LabelSnapshot),
    /// No candidates matched the query.
    NotFound { reason: String },
    /// Candidates split into materially different formulations; the caller
    /// must disambiguate. Nothing is persisted on this path.
    Ambiguous {
        options: Vec<FormulationOption>,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prefers_brand_name() {
        let opt = FormulationOption {
            set_id: "s1".into(),
            brand_names: vec!["Tylenol PM".into()],
            generic_names: vec!["Acetaminophen".into()],
            active_ingredients: vec!["acetaminophen".into(), "diphenhydramine".into()],
        };
        assert_eq!(opt.summary(), "Tylenol PM (acetaminophen, diphenhydramine)");
    }

    #[test]
    fn summary_handles_missing_names() {
        let opt = FormulationOption {
            set_id: "s2".into(),
            brand_names: vec![],
            generic_names: vec![],
            active_ingredients: vec![],
        };
        assert_eq!(opt.summary(), "(unnamed)");
    }
}
