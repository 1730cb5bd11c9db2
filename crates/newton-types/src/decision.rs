// ─────────────────────────────────────────────────────────────────────
// Newton — Decision and Safety Orders
// ─────────────────────────────────────────────────────────────────────
//! The four-vertex decision set, the total safety order over it, and
//! the risk buckets derived from simplex height.

use serde::{Deserialize, Serialize};

/// The four vertices of the decision tetrahedron.
///
/// This set is closed: it is never extended at runtime, and every
/// consumer matches exhaustively over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Generate a response (minimum safety).
    Answer,
    /// Redirect to an authoritative source (high safety).
    Defer,
    /// Request clarification (high safety).
    Ask,
    /// Decline to engage (maximum safety).
    Refuse,
}

impl Decision {
    /// All decisions in lattice enumeration order (bottom to top).
    pub const ALL: [Decision; 4] = [
        Decision::Answer,
        Decision::Defer,
        Decision::Ask,
        Decision::Refuse,
    ];

    /// Decisions scanned safest-first. Used wherever a tie between
    /// equal coordinates must resolve toward the safer choice.
    pub const SAFEST_FIRST: [Decision; 4] = [
        Decision::Refuse,
        Decision::Defer,
        Decision::Ask,
        Decision::Answer,
    ];

    /// Safety level of this decision in the governance lattice.
    pub fn safety_level(self) -> SafetyLevel {
        match self {
            Decision::Answer => SafetyLevel::Minimum,
            Decision::Defer | Decision::Ask => SafetyLevel::High,
            Decision::Refuse => SafetyLevel::Maximum,
        }
    }

    /// Canonical uppercase name, as used in node identifiers and
    /// serialized state.
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Answer => "ANSWER",
            Decision::Defer => "DEFER",
            Decision::Ask => "ASK",
            Decision::Refuse => "REFUSE",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Safety levels in the governance lattice.
///
/// Higher value = higher safety = closer to REFUSE. The derived `Ord`
/// follows declaration order, so levels compare directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyLevel {
    /// ANSWER (bottom of the lattice).
    Minimum,
    Low,
    Medium,
    /// DEFER/ASK level.
    High,
    /// REFUSE (top of the lattice).
    Maximum,
}

impl SafetyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SafetyLevel::Minimum => "MINIMUM",
            SafetyLevel::Low => "LOW",
            SafetyLevel::Medium => "MEDIUM",
            SafetyLevel::High => "HIGH",
            SafetyLevel::Maximum => "MAXIMUM",
        }
    }
}

impl std::fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk levels corresponding to height in the decision simplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Base of the tetrahedron.
    Low,
    Medium,
    /// Mid-plane (DEFER/ASK level).
    High,
    /// Apex (REFUSE level).
    Critical,
}

impl RiskLevel {
    /// Bucket a 0-1 score into a risk level.
    pub fn from_score(score: f64) -> RiskLevel {
        if score < 0.25 {
            RiskLevel::Low
        } else if score < 0.5 {
            RiskLevel::Medium
        } else if score < 0.75 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safety_level_total_order() {
        assert!(SafetyLevel::Minimum < SafetyLevel::Low);
        assert!(SafetyLevel::Low < SafetyLevel::Medium);
        assert!(SafetyLevel::Medium < SafetyLevel::High);
        assert!(SafetyLevel::High < SafetyLevel::Maximum);
    }

    #[test]
    fn test_decision_safety_mapping() {
        assert_eq!(Decision::Answer.safety_level(), SafetyLevel::Minimum);
        assert_eq!(Decision::Defer.safety_level(), SafetyLevel::High);
        assert_eq!(Decision::Ask.safety_level(), SafetyLevel::High);
        assert_eq!(Decision::Refuse.safety_level(), SafetyLevel::Maximum);
    }

    #[test]
    fn test_risk_level_buckets() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.24), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.25), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.49), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.5), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.74), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.75), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::Critical);
    }

    #[test]
    fn test_decision_serializes_uppercase() {
        let json = serde_json::to_string(&Decision::Refuse).unwrap();
        assert_eq!(json, "\"REFUSE\"");
    }

    #[test]
    fn test_safest_first_covers_all() {
        for d in Decision::ALL {
            assert!(Decision::SAFEST_FIRST.contains(&d));
        }
    }
}
