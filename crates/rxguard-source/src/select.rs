//! Deterministic candidate selection and ambiguity detection.
//!
//! Selection never guesses: among candidates with one formulation the newest
//! record wins (ties broken by ascending identifier), and candidates that
//! split into materially different active-ingredient sets force the caller
//! to disambiguate.

use std::collections::BTreeMap;

use rxguard_core::{FormulationOption, LabelRecord};

/// Upper bound on distinguishing options returned for an ambiguous query.
pub const MAX_AMBIGUITY_OPTIONS: usize = 5;

/// Pick the canonical record: descending numeric effective time, ties broken
/// by ascending stable-identifier comparison.
pub fn select_canonical(mut candidates: Vec<LabelRecord>) -> Option<LabelRecord> {
    candidates.sort_by(|a, b| {
        b.effective_time_num()
            .cmp(&a.effective_time_num())
            .then_with(|| a.stable_id().cmp(b.stable_id()))
    });
    candidates.into_iter().next()
}

/// Detect materially different formulations among candidates.
///
/// Groups by normalized, sorted, deduplicated active-ingredient set. Returns
/// the distinguishing options (bounded to [`MAX_AMBIGUITY_OPTIONS`], one per
/// group, in deterministic key order) when more than one candidate exists
/// and more than one group exists; otherwise `None`.
pub fn detect_ambiguity(candidates: &[LabelRecord]) -> Option<Vec<FormulationOption>> {
    if candidates.len() < 2 {
        return None;
    }
    let mut groups: BTreeMap<Vec<String>, &LabelRecord> = BTreeMap::new();
    for record in candidates {
        groups.entry(record.ingredient_key()).or_insert(record);
    }
    if groups.len() < 2 {
        return None;
    }
    Some(
        groups
            .into_iter()
            .take(MAX_AMBIGUITY_OPTIONS)
            .map(|(ingredients, record)| FormulationOption {
                set_id: record.set_id.clone().unwrap_or_default(),
                brand_names: record.openfda.brand_name.clone(),
                generic_names: record.openfda.generic_name.clone(),
                active_ingredients: ingredients,
            })
            .collect(),
    )
}
