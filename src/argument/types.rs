//! Annotation records.

use serde::{Deserialize, Serialize};

/// Stance a claim takes on the controversy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Pro,
    Con,
    Conditional,
    Neutral,
}

impl Stance {
    /// All stances in display order.
    pub const ALL: [Stance; 4] = [Stance::Pro, Stance::Con, Stance::Conditional, Stance::Neutral];

    /// Sort precedence in the argument map. Neutral sorts last.
    pub fn rank(self) -> u8 {
        match self {
            Stance::Pro => 0,
            Stance::Conditional => 1,
            Stance::Con => 2,
            Stance::Neutral => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stance::Pro => "支持",
            Stance::Con => "反对",
            Stance::Conditional => "条件支持",
            Stance::Neutral => "中立",
        }
    }

    /// Verb used in the combined explanation sentence.
    pub fn action(self) -> &'static str {
        match self {
            Stance::Pro => "支持",
            Stance::Con => "反对",
            Stance::Conditional | Stance::Neutral => "作为条件补充",
        }
    }
}

/// Kind of support an evidence sentence offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceType {
    Data,
    Expert,
    Experience,
    Analogy,
    #[serde(other)]
    Other,
}

impl EvidenceType {
    pub const ALL: [EvidenceType; 5] = [
        EvidenceType::Data,
        EvidenceType::Expert,
        EvidenceType::Experience,
        EvidenceType::Analogy,
        EvidenceType::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EvidenceType::Data => "数据/研究",
            EvidenceType::Expert => "权威/机构声明",
            EvidenceType::Experience => "个人经历/个案",
            EvidenceType::Analogy => "类比/假设",
            EvidenceType::Other => "其他",
        }
    }
}

/// A sentence marked as expressing a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    /// `C<n>`
    pub id: String,
    pub text: String,
    pub sentence_id: String,
    pub stance: Stance,
}

/// A sentence marked as supporting one claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// `E<n>`
    pub id: String,
    pub text: String,
    pub sentence_id: String,
    pub claim_id: String,
    #[serde(rename = "type")]
    pub evidence_type: EvidenceType,
}

/// The learner's explanation of why an evidence supports a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningBridge {
    /// `R<n>`
    pub id: String,
    pub claim_id: String,
    pub evidence_id: String,
    pub text: String,
}
