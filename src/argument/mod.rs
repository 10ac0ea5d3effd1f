//! Argument annotation.
//!
//! Learners mark sentences of the viewpoint passages as claims or
//! evidence, then explain each evidence/claim link with a reasoning
//! bridge. The annotations feed the argument map and its diagnosis.

mod map;
mod present;
mod set;
mod types;

pub use map::{
    build_records, diagnose, group_records, summarize, ArgumentMap, ArgumentRecord, Diagnosis,
    MapSummary, StanceGroups, StanceSummary,
};
pub use present::{
    combined_explanation, keyword_text, render_text, EMPTY_MAP_TEXT, KEYWORD_LEN,
    PHASE_INSTRUCTIONS,
};
pub use set::{next_id, ArgumentSet};
pub use types::{Claim, Evidence, EvidenceType, ReasoningBridge, Stance};

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::TopicCatalog;
use crate::content::{find_sentence, Sentence};
use crate::error::{AppResult, LearningError};
use crate::storage::{load_json_or_default, save_json, topic_key, SharedStore, TopicDataKind};

/// Argument map together with the panel visibility flag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentMapView {
    pub topic_id: String,
    pub visible: bool,
    /// Prompts for the three annotation phases.
    pub instructions: [&'static str; 3],
    #[serde(flatten)]
    pub map: ArgumentMap,
    /// Combined explanation per record, keyed by record id.
    pub explanations: BTreeMap<String, String>,
}

/// Persists annotations per topic and enforces the cascade rules.
#[derive(Clone)]
pub struct ArgumentService {
    store: SharedStore,
    catalog: Arc<dyn TopicCatalog>,
}

impl ArgumentService {
    pub fn new(store: SharedStore, catalog: Arc<dyn TopicCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Load all annotations of a topic. Missing or malformed lists are empty.
    pub async fn load(&self, topic_id: &str) -> AppResult<ArgumentSet> {
        let store = self.store.as_ref();
        Ok(ArgumentSet {
            claims: load_json_or_default(store, &topic_key(topic_id, TopicDataKind::Claims))
                .await?,
            evidences: load_json_or_default(store, &topic_key(topic_id, TopicDataKind::Evidences))
                .await?,
            bridges: load_json_or_default(
                store,
                &topic_key(topic_id, TopicDataKind::ReasoningBridge),
            )
            .await?,
        })
    }

    /// Overwrite all three annotation lists of a topic.
    pub async fn save(&self, topic_id: &str, set: &ArgumentSet) -> AppResult<()> {
        let store = self.store.as_ref();
        save_json(store, &topic_key(topic_id, TopicDataKind::Claims), &set.claims).await?;
        save_json(
            store,
            &topic_key(topic_id, TopicDataKind::Evidences),
            &set.evidences,
        )
        .await?;
        save_json(
            store,
            &topic_key(topic_id, TopicDataKind::ReasoningBridge),
            &set.bridges,
        )
        .await?;
        Ok(())
    }

    async fn sentence(&self, topic_id: &str, sentence_id: &str) -> AppResult<Sentence> {
        self.catalog.require(topic_id).await?;
        find_sentence(topic_id, sentence_id).ok_or_else(|| {
            LearningError::SentenceNotFound {
                sentence_id: sentence_id.to_string(),
            }
            .into()
        })
    }

    pub async fn add_claim(
        &self,
        topic_id: &str,
        sentence_id: &str,
        stance: Stance,
    ) -> AppResult<Claim> {
        let sentence = self.sentence(topic_id, sentence_id).await?;
        let mut set = self.load(topic_id).await?;
        let claim = set.add_claim(&sentence, stance)?;
        self.save(topic_id, &set).await?;

        debug!(topic_id = %topic_id, claim_id = %claim.id, ?stance, "Added claim");
        Ok(claim)
    }

    /// Remove a claim; its evidence and bridges go with it.
    pub async fn remove_claim(&self, topic_id: &str, claim_id: &str) -> AppResult<ArgumentSet> {
        self.catalog.require(topic_id).await?;
        let mut set = self.load(topic_id).await?;
        set.remove_claim(claim_id)?;
        self.save(topic_id, &set).await?;

        debug!(topic_id = %topic_id, claim_id = %claim_id, "Removed claim");
        Ok(set)
    }

    pub async fn add_evidence(
        &self,
        topic_id: &str,
        sentence_id: &str,
        claim_id: &str,
        evidence_type: EvidenceType,
    ) -> AppResult<Evidence> {
        let sentence = self.sentence(topic_id, sentence_id).await?;
        let mut set = self.load(topic_id).await?;
        let evidence = set.add_evidence(&sentence, claim_id, evidence_type)?;
        self.save(topic_id, &set).await?;

        debug!(topic_id = %topic_id, evidence_id = %evidence.id, claim_id = %claim_id, "Added evidence");
        Ok(evidence)
    }

    /// Remove an evidence; its bridges go with it.
    pub async fn remove_evidence(&self, topic_id: &str, evidence_id: &str) -> AppResult<ArgumentSet> {
        self.catalog.require(topic_id).await?;
        let mut set = self.load(topic_id).await?;
        set.remove_evidence(evidence_id)?;
        self.save(topic_id, &set).await?;

        debug!(topic_id = %topic_id, evidence_id = %evidence_id, "Removed evidence");
        Ok(set)
    }

    pub async fn add_bridge(
        &self,
        topic_id: &str,
        claim_id: &str,
        evidence_id: &str,
        text: &str,
    ) -> AppResult<ReasoningBridge> {
        self.catalog.require(topic_id).await?;
        let mut set = self.load(topic_id).await?;
        let bridge = set.add_bridge(claim_id, evidence_id, text)?;
        self.save(topic_id, &set).await?;

        debug!(topic_id = %topic_id, bridge_id = %bridge.id, "Added reasoning bridge");
        Ok(bridge)
    }

    /// Drop every annotation of a topic and collapse the map panel.
    pub async fn clear(&self, topic_id: &str) -> AppResult<()> {
        self.catalog.require(topic_id).await?;
        self.save(topic_id, &ArgumentSet::default()).await?;
        self.set_map_visible(topic_id, false).await?;

        info!(topic_id = %topic_id, "Cleared all annotations");
        Ok(())
    }

    pub async fn map_visible(&self, topic_id: &str) -> AppResult<bool> {
        Ok(load_json_or_default(
            self.store.as_ref(),
            &topic_key(topic_id, TopicDataKind::ShowArgumentMap),
        )
        .await?)
    }

    pub async fn set_map_visible(&self, topic_id: &str, visible: bool) -> AppResult<()> {
        save_json(
            self.store.as_ref(),
            &topic_key(topic_id, TopicDataKind::ShowArgumentMap),
            &visible,
        )
        .await?;
        Ok(())
    }

    /// Build the argument map of a topic, optionally updating panel visibility.
    pub async fn argument_map(
        &self,
        topic_id: &str,
        show: Option<bool>,
    ) -> AppResult<ArgumentMapView> {
        self.catalog.require(topic_id).await?;
        if let Some(visible) = show {
            self.set_map_visible(topic_id, visible).await?;
        }

        let set = self.load(topic_id).await?;
        let map = ArgumentMap::build(&set);
        let explanations = map
            .records
            .iter()
            .map(|record| (record.id.clone(), combined_explanation(record)))
            .collect();
        Ok(ArgumentMapView {
            topic_id: topic_id.to_string(),
            visible: self.map_visible(topic_id).await?,
            instructions: PHASE_INSTRUCTIONS,
            map,
            explanations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TopicService;
    use crate::config::LearningConfig;
    use crate::error::AppError;
    use crate::storage::{KeyValueStore, MemoryStorage};
    use pretty_assertions::assert_eq;

    fn service() -> (Arc<MemoryStorage>, ArgumentService) {
        let store = Arc::new(MemoryStorage::new());
        let catalog = Arc::new(TopicService::new(store.clone(), LearningConfig::default()));
        (store.clone(), ArgumentService::new(store, catalog))
    }

    #[tokio::test]
    async fn test_first_claim_is_c1() {
        let (_, service) = service();
        let claim = service.add_claim("1", "s1", Stance::Pro).await.unwrap();
        assert_eq!(claim.id, "C1");
        assert_eq!(
            claim.text,
            "福岛核事故已经过去十多年，处理核污染水是一个迫在眉睫的问题。"
        );
    }

    #[tokio::test]
    async fn test_unknown_sentence() {
        let (_, service) = service();
        let err = service.add_claim("2", "s20", Stance::Pro).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Learning(LearningError::SentenceNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let (_, service) = service();
        service.add_claim("1", "s1", Stance::Pro).await.unwrap();
        service.add_claim("1", "s8", Stance::Con).await.unwrap();
        service
            .add_evidence("1", "s3", "C1", EvidenceType::Expert)
            .await
            .unwrap();
        service.add_bridge("1", "C1", "E1", "机构可信").await.unwrap();

        let set = service.load("1").await.unwrap();
        service.save("1", &set).await.unwrap();
        assert_eq!(service.load("1").await.unwrap(), set);
        assert_eq!(set.claims.len(), 2);
        assert_eq!(set.evidences[0].evidence_type, EvidenceType::Expert);
    }

    #[tokio::test]
    async fn test_remove_claim_cascades_in_store() {
        let (_, service) = service();
        service.add_claim("1", "s1", Stance::Pro).await.unwrap();
        service
            .add_evidence("1", "s2", "C1", EvidenceType::Data)
            .await
            .unwrap();
        service.add_bridge("1", "C1", "E1", "因为").await.unwrap();

        service.remove_claim("1", "C1").await.unwrap();
        assert!(service.load("1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_resets_visibility() {
        let (store, service) = service();
        service.add_claim("1", "s1", Stance::Pro).await.unwrap();
        let view = service.argument_map("1", Some(true)).await.unwrap();
        assert!(view.visible);

        service.clear("1").await.unwrap();
        let view = service.argument_map("1", None).await.unwrap();
        assert!(!view.visible);
        assert_eq!(
            store.get("topic_1_claims").await.unwrap(),
            Some("[]".to_string())
        );
    }

    #[tokio::test]
    async fn test_map_view_explains_each_record() {
        let (_, service) = service();
        service.add_claim("1", "s1", Stance::Pro).await.unwrap();
        service
            .add_evidence("1", "s2", "C1", EvidenceType::Data)
            .await
            .unwrap();

        let view = service.argument_map("1", None).await.unwrap();
        assert_eq!(view.instructions, PHASE_INSTRUCTIONS);
        assert_eq!(view.explanations.len(), 1);

        let text = &view.explanations["E1-C1"];
        assert!(text.starts_with("因为【我们已经采用了先进的ALPS处理系统"));
        assert!(text.contains("【(暂无填写)】"));
        assert!(text.contains("所以你用它来支持【福岛核事故已经过去十多年"));

        service.add_bridge("1", "C1", "E1", "技术可靠").await.unwrap();
        let view = service.argument_map("1", None).await.unwrap();
        assert!(view.explanations["E1-C1"].contains("再加上你认为【技术可靠】"));
    }

    #[tokio::test]
    async fn test_topics_do_not_share_annotations() {
        let (_, service) = service();
        service.add_claim("1", "s1", Stance::Pro).await.unwrap();
        assert!(service.load("2").await.unwrap().claims.is_empty());
    }
}
