//! Argument map assembly and structural diagnosis.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::set::ArgumentSet;
use super::types::{EvidenceType, Stance};

/// One row of the argument map: an evidence joined with its claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentRecord {
    /// `<evidenceId>-<claimId>`
    pub id: String,
    pub stance: Stance,
    pub claim_id: String,
    pub claim_text: String,
    pub evidence_id: String,
    pub evidence_text: String,
    pub bridge_text: Option<String>,
    pub evidence_type: EvidenceType,
}

/// Records partitioned by stance. Neutral records belong to no group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StanceGroups {
    pub pro: Vec<ArgumentRecord>,
    pub conditional: Vec<ArgumentRecord>,
    pub con: Vec<ArgumentRecord>,
}

/// Counts for one stance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StanceSummary {
    pub claim_count: usize,
    pub evidence_count: usize,
    pub bridge_count: usize,
}

/// Summary cards shown above the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSummary {
    pub pro: StanceSummary,
    pub conditional: StanceSummary,
    pub con: StanceSummary,
    pub neutral: StanceSummary,
}

/// Outcome of the structural check, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnosis {
    NoClaims,
    OneSided,
    UnsupportedClaims {
        #[serde(rename = "claimCount")]
        claim_count: usize,
        #[serde(rename = "claimIds")]
        claim_ids: Vec<String>,
    },
    PartiallyBridged { percent: u32 },
    Complete,
    NoBridges,
}

impl Diagnosis {
    /// Learner-facing report text.
    pub fn message(&self) -> String {
        match self {
            Diagnosis::NoClaims => "你还没有标注任何主张。试着在所有材料中找出真正表达立场的句子，这是理解整个论证的第一步。".to_string(),
            Diagnosis::OneSided => "目前你标注的主张几乎都来自同一立场，另一方的论证结构尚未被完整纳入地图。可以思考：是否还有不同立场的声音没有被记录？".to_string(),
            Diagnosis::UnsupportedClaims { claim_count, claim_ids } => format!(
                "你已经标出了{}个主张，但其中{}目前没有任何证据支撑，更像是态度表达而不是论证。你可以回到材料中，尝试为这些观点寻找可核查的依据。",
                claim_count,
                claim_ids.join("、")
            ),
            Diagnosis::PartiallyBridged { percent } => format!(
                "你为不少主张找到了证据，并且为{}%的证据添加了推理桥。继续思考其他证据与主张之间的逻辑关系，可以让你的分析更加深入和完整。",
                percent
            ),
            Diagnosis::Complete => "你的论证地图已经包含了多立场观点、相应的证据支持以及连接它们的推理桥，结构相对完整。接下来可以思考这些论证的说服力和可能存在的漏洞。".to_string(),
            Diagnosis::NoBridges => "你已经为各个观点找到了证据，但尚未尝试写出'证据–主张'之间的推理桥。试着用一句话解释：为什么这些事实足以支撑这个结论？这将帮助你更好地理解论证的逻辑结构。".to_string(),
        }
    }
}

/// Join every evidence with its claim and optional bridge, sorted by
/// stance precedence, then claim id, then evidence id.
///
/// Evidence whose claim cannot be found is dropped.
pub fn build_records(set: &ArgumentSet) -> Vec<ArgumentRecord> {
    let mut records: Vec<ArgumentRecord> = set
        .evidences
        .iter()
        .filter_map(|evidence| {
            let claim = set.claim(&evidence.claim_id)?;
            let bridge = set.bridge_for(&claim.id, &evidence.id);
            Some(ArgumentRecord {
                id: format!("{}-{}", evidence.id, claim.id),
                stance: claim.stance,
                claim_id: claim.id.clone(),
                claim_text: claim.text.clone(),
                evidence_id: evidence.id.clone(),
                evidence_text: evidence.text.clone(),
                bridge_text: bridge.map(|b| b.text.clone()),
                evidence_type: evidence.evidence_type,
            })
        })
        .collect();

    records.sort_by(|a, b| {
        a.stance
            .rank()
            .cmp(&b.stance.rank())
            .then_with(|| a.claim_id.cmp(&b.claim_id))
            .then_with(|| a.evidence_id.cmp(&b.evidence_id))
    });
    records
}

pub fn group_records(records: &[ArgumentRecord]) -> StanceGroups {
    let pick = |stance: Stance| {
        records
            .iter()
            .filter(|r| r.stance == stance)
            .cloned()
            .collect::<Vec<_>>()
    };
    StanceGroups {
        pro: pick(Stance::Pro),
        conditional: pick(Stance::Conditional),
        con: pick(Stance::Con),
    }
}

pub fn summarize(set: &ArgumentSet, stance: Stance) -> StanceSummary {
    let claim_ids: HashSet<&str> = set
        .claims
        .iter()
        .filter(|c| c.stance == stance)
        .map(|c| c.id.as_str())
        .collect();

    StanceSummary {
        claim_count: claim_ids.len(),
        evidence_count: set
            .evidences
            .iter()
            .filter(|e| claim_ids.contains(e.claim_id.as_str()))
            .count(),
        bridge_count: set
            .bridges
            .iter()
            .filter(|b| claim_ids.contains(b.claim_id.as_str()))
            .count(),
    }
}

/// Check the structure of the annotations. The first matching rule wins.
pub fn diagnose(set: &ArgumentSet) -> Diagnosis {
    if set.claims.is_empty() {
        return Diagnosis::NoClaims;
    }

    let count = |stance: Stance| set.claims.iter().filter(|c| c.stance == stance).count();
    let pro = count(Stance::Pro);
    let con = count(Stance::Con);
    let third = count(Stance::Conditional) + count(Stance::Neutral);
    let one_sided = (pro > 0 && con == 0 && third == 0) || (con > 0 && pro == 0 && third == 0);
    if one_sided {
        return Diagnosis::OneSided;
    }

    let unsupported: Vec<String> = set
        .claims
        .iter()
        .filter(|c| !set.evidences.iter().any(|e| e.claim_id == c.id))
        .map(|c| c.id.clone())
        .collect();
    if !unsupported.is_empty() {
        return Diagnosis::UnsupportedClaims {
            claim_count: set.claims.len(),
            claim_ids: unsupported,
        };
    }

    if set.bridges.is_empty() {
        return Diagnosis::NoBridges;
    }

    let bridged = set
        .bridges
        .iter()
        .map(|b| b.evidence_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let total = set.evidences.len();
    if bridged < total {
        let percent = (bridged as f64 / total as f64 * 100.0).round() as u32;
        Diagnosis::PartiallyBridged { percent }
    } else {
        Diagnosis::Complete
    }
}

/// Everything the argument map view renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentMap {
    pub records: Vec<ArgumentRecord>,
    pub groups: StanceGroups,
    pub summary: MapSummary,
    pub diagnosis: Diagnosis,
    pub diagnosis_text: String,
}

impl ArgumentMap {
    pub fn build(set: &ArgumentSet) -> Self {
        let records = build_records(set);
        let groups = group_records(&records);
        let diagnosis = diagnose(set);
        Self {
            summary: MapSummary {
                pro: summarize(set, Stance::Pro),
                conditional: summarize(set, Stance::Conditional),
                con: summarize(set, Stance::Con),
                neutral: summarize(set, Stance::Neutral),
            },
            diagnosis_text: diagnosis.message(),
            records,
            groups,
            diagnosis,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[path = "map_tests.rs"]
mod map_tests;
