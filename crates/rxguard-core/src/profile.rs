//! Optional user context supplied with a question.

use serde::{Deserialize, Serialize};

/// Pregnancy status as reported by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PregnancyStatus {
    NotPregnant,
    Trying,
    FirstTrimester,
    SecondTrimester,
    ThirdTrimester,
    Unknown,
}

impl PregnancyStatus {
    /// Whether the pregnancy-gated rule may fire.
    ///
    /// `Unknown` does not widen the gate: the rule only fires on an explicit
    /// pregnant-or-trying signal.
    pub fn pregnant_or_trying(&self) -> bool {
        !matches!(self, Self::NotPregnant | Self::Unknown)
    }
}

/// Free-text user context. All fields optional; absent context simply means
/// fewer rules can fire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RxGuardProfile {
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub pregnancy: Option<PregnancyStatus>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub current_meds: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}
