//! Risk lattice and decision enums.

use serde::{Deserialize, Serialize};

/// Totally ordered risk scale: `UNKNOWN < LOW < MODERATE < HIGH`.
///
/// Combining always takes the maximum, so evidence-backed severity never
/// decreases as more rules fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Risk {
    Unknown,
    Low,
    Moderate,
    High,
}

impl Risk {
    /// Monotonic, idempotent combination: `max(self, other)`.
    pub fn combine(self, other: Risk) -> Risk {
        self.max(other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
        }
    }
}

/// Final gate decision attached to a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Block,
    Caution,
    Clarify,
    Info,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Block => "BLOCK",
            Self::Caution => "CAUTION",
            Self::Clarify => "CLARIFY",
            Self::Info => "INFO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Risk; 4] = [Risk::Unknown, Risk::Low, Risk::Moderate, Risk::High];

    #[test]
    fn order_is_unknown_low_moderate_high() {
        assert!(Risk::Unknown < Risk::Low);
        assert!(Risk::Low < Risk::Moderate);
        assert!(Risk::Moderate < Risk::High);
    }

    #[test]
    fn combine_is_monotonic_and_idempotent() {
        for a in ALL {
            for b in ALL {
                let c = a.combine(b);
                assert!(c >= a);
                assert!(c >= b);
                assert_eq!(c, b.combine(a));
                assert_eq!(a.combine(a), a);
            }
        }
    }

    #[test]
    fn serde_uses_uppercase() {
        assert_eq!(serde_json::to_string(&Risk::Moderate).unwrap(), "\"MODERATE\"");
        assert_eq!(serde_json::to_string(&Decision::Block).unwrap(), "\"BLOCK\"");
        let risk: Risk = serde_json::from_str("\"HIGH\"").unwrap();
        assert_eq!(risk, Risk::High);
    }
}
