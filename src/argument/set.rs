//! In-memory argument annotations with referential integrity.

use serde::{Deserialize, Serialize};

use super::types::{Claim, Evidence, EvidenceType, ReasoningBridge, Stance};
use crate::content::Sentence;
use crate::error::LearningError;

/// Claims, evidence and bridges for one topic.
///
/// Every evidence references an existing claim and every bridge an
/// existing (claim, evidence) pair. Removals cascade to keep it that way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSet {
    pub claims: Vec<Claim>,
    pub evidences: Vec<Evidence>,
    pub bridges: Vec<ReasoningBridge>,
}

/// Next `<prefix><n>` id, one past the largest numeric suffix in use.
pub fn next_id<'a>(prefix: &str, ids: impl IntoIterator<Item = &'a str>) -> String {
    let max = ids
        .into_iter()
        .filter_map(|id| id.strip_prefix(prefix)?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{}{}", prefix, max + 1)
}

impl ArgumentSet {
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty() && self.evidences.is_empty() && self.bridges.is_empty()
    }

    pub fn claim(&self, claim_id: &str) -> Option<&Claim> {
        self.claims.iter().find(|c| c.id == claim_id)
    }

    pub fn evidence(&self, evidence_id: &str) -> Option<&Evidence> {
        self.evidences.iter().find(|e| e.id == evidence_id)
    }

    pub fn bridge_for(&self, claim_id: &str, evidence_id: &str) -> Option<&ReasoningBridge> {
        self.bridges
            .iter()
            .find(|b| b.claim_id == claim_id && b.evidence_id == evidence_id)
    }

    /// Mark a sentence as a claim.
    pub fn add_claim(
        &mut self,
        sentence: &Sentence,
        stance: Stance,
    ) -> Result<Claim, LearningError> {
        if self.claims.iter().any(|c| c.sentence_id == sentence.id) {
            return Err(LearningError::AlreadyAnnotated {
                sentence_id: sentence.id.clone(),
                kind: "claim".to_string(),
            });
        }

        let claim = Claim {
            id: next_id("C", self.claims.iter().map(|c| c.id.as_str())),
            text: sentence.text.clone(),
            sentence_id: sentence.id.clone(),
            stance,
        };
        self.claims.push(claim.clone());
        Ok(claim)
    }

    /// Mark a sentence as evidence for an existing claim.
    pub fn add_evidence(
        &mut self,
        sentence: &Sentence,
        claim_id: &str,
        evidence_type: EvidenceType,
    ) -> Result<Evidence, LearningError> {
        if self.claims.is_empty() {
            return Err(LearningError::NoClaims);
        }
        if self.claim(claim_id).is_none() {
            return Err(LearningError::ClaimNotFound {
                claim_id: claim_id.to_string(),
            });
        }
        if self.evidences.iter().any(|e| e.sentence_id == sentence.id) {
            return Err(LearningError::AlreadyAnnotated {
                sentence_id: sentence.id.clone(),
                kind: "evidence".to_string(),
            });
        }

        let evidence = Evidence {
            id: next_id("E", self.evidences.iter().map(|e| e.id.as_str())),
            text: sentence.text.clone(),
            sentence_id: sentence.id.clone(),
            claim_id: claim_id.to_string(),
            evidence_type,
        };
        self.evidences.push(evidence.clone());
        Ok(evidence)
    }

    /// Attach a bridge to an evidence of a claim.
    ///
    /// A second bridge for the same pair replaces the text of the first.
    pub fn add_bridge(
        &mut self,
        claim_id: &str,
        evidence_id: &str,
        text: &str,
    ) -> Result<ReasoningBridge, LearningError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LearningError::Validation {
                field: "text".to_string(),
                reason: "reasoning bridge text must not be empty".to_string(),
            });
        }
        if self.claim(claim_id).is_none() {
            return Err(LearningError::ClaimNotFound {
                claim_id: claim_id.to_string(),
            });
        }
        let evidence = self
            .evidence(evidence_id)
            .ok_or_else(|| LearningError::EvidenceNotFound {
                evidence_id: evidence_id.to_string(),
            })?;
        if evidence.claim_id != claim_id {
            return Err(LearningError::EvidenceClaimMismatch {
                evidence_id: evidence_id.to_string(),
                claim_id: claim_id.to_string(),
            });
        }

        if let Some(existing) = self
            .bridges
            .iter_mut()
            .find(|b| b.claim_id == claim_id && b.evidence_id == evidence_id)
        {
            existing.text = text.to_string();
            return Ok(existing.clone());
        }

        let bridge = ReasoningBridge {
            id: next_id("R", self.bridges.iter().map(|b| b.id.as_str())),
            claim_id: claim_id.to_string(),
            evidence_id: evidence_id.to_string(),
            text: text.to_string(),
        };
        self.bridges.push(bridge.clone());
        Ok(bridge)
    }

    /// Remove a claim with its evidence and bridges.
    pub fn remove_claim(&mut self, claim_id: &str) -> Result<Claim, LearningError> {
        let index = self
            .claims
            .iter()
            .position(|c| c.id == claim_id)
            .ok_or_else(|| LearningError::ClaimNotFound {
                claim_id: claim_id.to_string(),
            })?;
        let claim = self.claims.remove(index);

        self.evidences.retain(|e| e.claim_id != claim.id);
        self.bridges.retain(|b| b.claim_id != claim.id);
        Ok(claim)
    }

    /// Remove an evidence with its bridges.
    pub fn remove_evidence(&mut self, evidence_id: &str) -> Result<Evidence, LearningError> {
        let index = self
            .evidences
            .iter()
            .position(|e| e.id == evidence_id)
            .ok_or_else(|| LearningError::EvidenceNotFound {
                evidence_id: evidence_id.to_string(),
            })?;
        let evidence = self.evidences.remove(index);

        self.bridges.retain(|b| b.evidence_id != evidence.id);
        Ok(evidence)
    }

    pub fn clear(&mut self) {
        self.claims.clear();
        self.evidences.clear();
        self.bridges.clear();
    }
}
