// ─────────────────────────────────────────────────────────────────────
// Newton — Request Categories and Pipeline Stages
// ─────────────────────────────────────────────────────────────────────
//! Request categories routed by the computation graph, and the fixed
//! six-stage processing pipeline tracked for audit purposes.

use serde::{Deserialize, Serialize};

use crate::decision::Decision;

/// Categories of incoming requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    // Harmful: always REFUSE.
    Harmful,
    PersonalData,

    // Professional domains: DEFER.
    MedicalAdvice,
    LegalAdvice,
    FinancialAdvice,

    // Standard requests: ANSWER.
    Question,
    Opinion,
    Instruction,
    Code,

    // Unclear: ASK.
    Unknown,
    Ambiguous,
}

impl RequestType {
    pub const ALL: [RequestType; 11] = [
        RequestType::Harmful,
        RequestType::PersonalData,
        RequestType::MedicalAdvice,
        RequestType::LegalAdvice,
        RequestType::FinancialAdvice,
        RequestType::Question,
        RequestType::Opinion,
        RequestType::Instruction,
        RequestType::Code,
        RequestType::Unknown,
        RequestType::Ambiguous,
    ];

    /// The decision a request type maps to when routing cannot reach
    /// a decision node (default-graph fallback only).
    pub fn default_decision(self) -> Decision {
        match self {
            RequestType::Harmful | RequestType::PersonalData => Decision::Refuse,
            RequestType::MedicalAdvice
            | RequestType::LegalAdvice
            | RequestType::FinancialAdvice => Decision::Defer,
            RequestType::Question
            | RequestType::Opinion
            | RequestType::Instruction
            | RequestType::Code => Decision::Answer,
            RequestType::Unknown | RequestType::Ambiguous => Decision::Ask,
        }
    }

    /// Canonical uppercase name, as used in graph node identifiers.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestType::Harmful => "HARMFUL",
            RequestType::PersonalData => "PERSONAL_DATA",
            RequestType::MedicalAdvice => "MEDICAL_ADVICE",
            RequestType::LegalAdvice => "LEGAL_ADVICE",
            RequestType::FinancialAdvice => "FINANCIAL_ADVICE",
            RequestType::Question => "QUESTION",
            RequestType::Opinion => "OPINION",
            RequestType::Instruction => "INSTRUCTION",
            RequestType::Code => "CODE",
            RequestType::Unknown => "UNKNOWN",
            RequestType::Ambiguous => "AMBIGUOUS",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stages in the computation pipeline.
///
/// The pipeline is linear and unrelated to the request-to-decision
/// edges; it exists so every evaluation has an auditable stage trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStage {
    Classify,
    Type,
    Risk,
    Verify,
    Decide,
    Output,
}

impl ProcessingStage {
    /// The fixed pipeline order.
    pub const PIPELINE: [ProcessingStage; 6] = [
        ProcessingStage::Classify,
        ProcessingStage::Type,
        ProcessingStage::Risk,
        ProcessingStage::Verify,
        ProcessingStage::Decide,
        ProcessingStage::Output,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingStage::Classify => "CLASSIFY",
            ProcessingStage::Type => "TYPE",
            ProcessingStage::Risk => "RISK",
            ProcessingStage::Verify => "VERIFY",
            ProcessingStage::Decide => "DECIDE",
            ProcessingStage::Output => "OUTPUT",
        }
    }
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_decisions() {
        assert_eq!(RequestType::Harmful.default_decision(), Decision::Refuse);
        assert_eq!(
            RequestType::PersonalData.default_decision(),
            Decision::Refuse
        );
        assert_eq!(
            RequestType::MedicalAdvice.default_decision(),
            Decision::Defer
        );
        assert_eq!(RequestType::Question.default_decision(), Decision::Answer);
        assert_eq!(RequestType::Code.default_decision(), Decision::Answer);
        assert_eq!(RequestType::Unknown.default_decision(), Decision::Ask);
        assert_eq!(RequestType::Ambiguous.default_decision(), Decision::Ask);
    }

    #[test]
    fn test_pipeline_order() {
        assert_eq!(ProcessingStage::PIPELINE.len(), 6);
        assert_eq!(ProcessingStage::PIPELINE[0], ProcessingStage::Classify);
        assert_eq!(ProcessingStage::PIPELINE[5], ProcessingStage::Output);
    }

    #[test]
    fn test_request_type_names() {
        assert_eq!(RequestType::PersonalData.as_str(), "PERSONAL_DATA");
        assert_eq!(RequestType::MedicalAdvice.to_string(), "MEDICAL_ADVICE");
    }
}
