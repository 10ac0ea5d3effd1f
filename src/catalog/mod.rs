//! Topic catalog.
//!
//! The catalog is the list of controversies a learner can study. It starts
//! as the six built-in topics and can be extended with mock "AI generated"
//! topics, which are the only ones a learner may delete.

mod builtins;

pub use builtins::{builtin_topics, GENERATED_TOPIC_ID};

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::LearningConfig;
use crate::error::{AppResult, LearningError};
use crate::storage::{clear_topic, load_json, save_json, SharedStore, TOPICS_KEY};

/// Number of topics every learner starts with.
pub const BUILTIN_TOPIC_COUNT: usize = 6;

/// Completed-topic count shown on the statistics card.
const COMPLETED_TOPICS: u32 = 2;

/// Topic difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Introductory.
    #[serde(rename = "入门")]
    Beginner,
    /// Advanced.
    #[serde(rename = "进阶")]
    Advanced,
}

impl Difficulty {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "入门",
            Difficulty::Advanced => "进阶",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a topic came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicSource {
    /// Shipped with the application.
    #[default]
    Default,
    /// Produced by topic generation.
    Ai,
}

/// A controversy topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    /// Estimated duration in minutes.
    pub duration: u32,
    #[serde(
        rename = "isAIGenerated",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_ai_generated: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controversy_type: Vec<String>,
    #[serde(default)]
    pub source: TopicSource,
}

impl Topic {
    /// Whether the topic was generated rather than built in.
    pub fn is_generated(&self) -> bool {
        self.source == TopicSource::Ai || self.is_ai_generated == Some(true)
    }
}

/// A generated topic before it is added to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDraft {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    pub duration: u32,
}

/// Figures shown on the learner's statistics card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStats {
    pub goal_topics: u32,
    pub completed_topics: u32,
    pub participated_topics: u32,
    pub in_progress_topics: u32,
    /// Completion percentage, rounded.
    pub progress_percent: u32,
}

impl LearningStats {
    /// Compute the card from the number of generated topics.
    pub fn from_generated_count(generated: usize) -> Self {
        let goal = (BUILTIN_TOPIC_COUNT + generated) as u32;
        let completed = COMPLETED_TOPICS;
        let percent = if goal == 0 {
            0
        } else {
            (f64::from(completed) / f64::from(goal) * 100.0).round() as u32
        };
        Self {
            goal_topics: goal,
            completed_topics: completed,
            participated_topics: goal,
            in_progress_topics: goal.saturating_sub(completed),
            progress_percent: percent,
        }
    }
}

/// Read-only topic queries shared by every learning service.
#[async_trait]
pub trait TopicCatalog: Send + Sync {
    /// All topics in catalog order.
    async fn list(&self) -> AppResult<Vec<Topic>>;

    /// Look up one topic.
    async fn get(&self, topic_id: &str) -> AppResult<Option<Topic>>;

    /// Delay a front end should wait before redirecting away from an unknown topic.
    fn redirect_delay_ms(&self) -> u64;

    /// Topics of one difficulty.
    async fn by_difficulty(&self, difficulty: Difficulty) -> AppResult<Vec<Topic>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|t| t.difficulty == difficulty)
            .collect())
    }

    /// Look up one topic, failing with a learner notice when it is unknown.
    async fn require(&self, topic_id: &str) -> AppResult<Topic> {
        match self.get(topic_id).await? {
            Some(topic) => Ok(topic),
            None => Err(LearningError::TopicNotFound {
                topic_id: topic_id.to_string(),
                redirect_after_ms: self.redirect_delay_ms(),
            }
            .into()),
        }
    }
}

/// Store-backed topic catalog.
#[derive(Clone)]
pub struct TopicService {
    store: SharedStore,
    config: LearningConfig,
}

impl TopicService {
    /// Create a catalog over the given store.
    pub fn new(store: SharedStore, config: LearningConfig) -> Self {
        Self { store, config }
    }

    async fn save(&self, topics: &[Topic]) -> AppResult<()> {
        save_json(self.store.as_ref(), TOPICS_KEY, topics).await?;
        Ok(())
    }

    /// Produce a mock topic draft for an interest area.
    ///
    /// Waits the configured simulated latency, then returns the same draft
    /// for every interest; only the duration follows the difficulty.
    pub async fn generate(&self, interest: &str, difficulty: Difficulty) -> AppResult<TopicDraft> {
        if interest.trim().is_empty() {
            return Err(LearningError::Validation {
                field: "interest".to_string(),
                reason: "interest area must not be empty".to_string(),
            }
            .into());
        }

        debug!(interest = %interest, %difficulty, "Generating topic draft");
        if self.config.simulated_latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.simulated_latency_ms)).await;
        }

        let (title, description, tags, duration) = builtins::generated_draft(difficulty);
        Ok(TopicDraft {
            title,
            description,
            tags,
            difficulty,
            duration,
        })
    }

    /// Add a generated draft to the front of the catalog.
    ///
    /// The generated topic has a fixed id, so adding it twice is a no-op.
    pub async fn add_generated(&self, draft: TopicDraft) -> AppResult<Vec<Topic>> {
        let mut topics = self.list().await?;
        if topics.iter().any(|t| t.id == GENERATED_TOPIC_ID) {
            debug!("Generated topic already present");
            return Ok(topics);
        }

        topics.insert(
            0,
            Topic {
                id: GENERATED_TOPIC_ID.to_string(),
                title: draft.title,
                description: draft.description,
                tags: draft.tags,
                difficulty: draft.difficulty,
                duration: draft.duration,
                is_ai_generated: Some(true),
                subject_tags: Vec::new(),
                controversy_type: Vec::new(),
                source: TopicSource::Ai,
            },
        );
        self.save(&topics).await?;

        info!(topic_id = GENERATED_TOPIC_ID, "Added generated topic");
        Ok(topics)
    }

    /// Delete a generated topic together with its stored artifacts.
    pub async fn delete(&self, topic_id: &str) -> AppResult<Vec<Topic>> {
        let mut topics = self.list().await?;
        let Some(index) = topics.iter().position(|t| t.id == topic_id) else {
            return Err(LearningError::TopicNotFound {
                topic_id: topic_id.to_string(),
                redirect_after_ms: self.config.redirect_delay_ms,
            }
            .into());
        };

        if !topics[index].is_generated() {
            return Err(LearningError::TopicNotDeletable {
                topic_id: topic_id.to_string(),
            }
            .into());
        }

        topics.remove(index);
        self.save(&topics).await?;
        let removed = clear_topic(self.store.as_ref(), topic_id).await?;

        info!(topic_id = %topic_id, artifacts = removed.len(), "Deleted generated topic");
        Ok(topics)
    }

    /// Statistics card for the current catalog.
    pub async fn stats(&self) -> AppResult<LearningStats> {
        let generated = self
            .list()
            .await?
            .iter()
            .filter(|t| t.is_generated())
            .count();
        Ok(LearningStats::from_generated_count(generated))
    }
}

#[async_trait]
impl TopicCatalog for TopicService {
    async fn list(&self) -> AppResult<Vec<Topic>> {
        let stored: Option<Vec<Topic>> = load_json(self.store.as_ref(), TOPICS_KEY).await?;
        Ok(stored.unwrap_or_else(builtin_topics))
    }

    async fn get(&self, topic_id: &str) -> AppResult<Option<Topic>> {
        Ok(self.list().await?.into_iter().find(|t| t.id == topic_id))
    }

    fn redirect_delay_ms(&self) -> u64 {
        self.config.redirect_delay_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::storage::{topic_key, KeyValueStore, MemoryStorage, TopicDataKind};
    use std::sync::Arc;

    fn service() -> (Arc<MemoryStorage>, TopicService) {
        let store = Arc::new(MemoryStorage::new());
        let config = LearningConfig {
            simulated_latency_ms: 0,
            ..LearningConfig::default()
        };
        (store.clone(), TopicService::new(store, config))
    }

    #[test]
    fn test_builtin_topics() {
        let topics = builtin_topics();
        assert_eq!(topics.len(), BUILTIN_TOPIC_COUNT);
        assert_eq!(topics[0].id, "1");
        assert_eq!(topics[0].title, "核污染水排海是否可接受？");
        assert!(topics.iter().all(|t| t.source == TopicSource::Default));
        assert!(topics.iter().all(|t| !t.is_generated()));
    }

    #[test]
    fn test_topic_wire_format() {
        let topic = &builtin_topics()[1];
        let json = serde_json::to_value(topic).unwrap();
        assert_eq!(json["difficulty"], "入门");
        assert_eq!(json["subjectTags"][0], "计算机科学");
        assert_eq!(json["source"], "default");
        assert!(json.get("isAIGenerated").is_none());
    }

    #[test]
    fn test_topic_without_source_defaults() {
        let raw = r#"{"id":"9","title":"t","description":"d","tags":[],"difficulty":"进阶","duration":10}"#;
        let topic: Topic = serde_json::from_str(raw).unwrap();
        assert_eq!(topic.source, TopicSource::Default);
        assert_eq!(topic.difficulty, Difficulty::Advanced);
    }

    #[test]
    fn test_stats_without_generated_topics() {
        let stats = LearningStats::from_generated_count(0);
        assert_eq!(stats.goal_topics, 6);
        assert_eq!(stats.completed_topics, 2);
        assert_eq!(stats.participated_topics, 6);
        assert_eq!(stats.in_progress_topics, 4);
        assert_eq!(stats.progress_percent, 33);
    }

    #[test]
    fn test_stats_with_generated_topic() {
        let stats = LearningStats::from_generated_count(1);
        assert_eq!(stats.goal_topics, 7);
        assert_eq!(stats.in_progress_topics, 5);
        assert_eq!(stats.progress_percent, 29);
    }

    #[tokio::test]
    async fn test_list_falls_back_to_builtins() {
        let (store, service) = service();
        assert_eq!(service.list().await.unwrap().len(), 6);

        store.set(TOPICS_KEY, "not json").await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_by_difficulty() {
        let (_, service) = service();
        let beginner = service.by_difficulty(Difficulty::Beginner).await.unwrap();
        let ids: Vec<_> = beginner.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4", "5"]);
    }

    #[tokio::test]
    async fn test_require_unknown_topic() {
        let (_, service) = service();
        let err = service.require("404").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Learning(LearningError::TopicNotFound {
                redirect_after_ms: 2000,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_interest() {
        let (_, service) = service();
        let err = service.generate("  ", Difficulty::Beginner).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Learning(LearningError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_generate_duration_follows_difficulty() {
        let (_, service) = service();
        let easy = service.generate("医疗", Difficulty::Beginner).await.unwrap();
        let hard = service.generate("医疗", Difficulty::Advanced).await.unwrap();
        assert_eq!(easy.title, "安乐死是否应该合法化？");
        assert_eq!(easy.duration, 25);
        assert_eq!(hard.duration, 40);
    }

    #[tokio::test]
    async fn test_add_generated_is_idempotent() {
        let (_, service) = service();
        let draft = service.generate("医疗", Difficulty::Beginner).await.unwrap();

        let topics = service.add_generated(draft.clone()).await.unwrap();
        assert_eq!(topics.len(), 7);
        assert_eq!(topics[0].id, GENERATED_TOPIC_ID);
        assert_eq!(topics[0].source, TopicSource::Ai);
        assert_eq!(topics[0].is_ai_generated, Some(true));

        let again = service.add_generated(draft).await.unwrap();
        assert_eq!(again.len(), 7);
        assert_eq!(service.stats().await.unwrap().goal_topics, 7);
    }

    #[tokio::test]
    async fn test_generated_topic_is_learnable() {
        let (_, service) = service();
        let draft = service.generate("医疗", Difficulty::Advanced).await.unwrap();
        service.add_generated(draft).await.unwrap();

        let topic = service.require(GENERATED_TOPIC_ID).await.unwrap();
        assert_eq!(topic.duration, 40);
    }

    #[tokio::test]
    async fn test_delete_only_generated_topics() {
        let (store, service) = service();
        let err = service.delete("1").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Learning(LearningError::TopicNotDeletable { .. })
        ));

        let draft = service.generate("医疗", Difficulty::Beginner).await.unwrap();
        service.add_generated(draft).await.unwrap();
        let key = topic_key(GENERATED_TOPIC_ID, TopicDataKind::Claims);
        store.set(&key, "[]").await.unwrap();

        let topics = service.delete(GENERATED_TOPIC_ID).await.unwrap();
        assert_eq!(topics.len(), 6);
        assert!(store.get(&key).await.unwrap().is_none());
    }
}
