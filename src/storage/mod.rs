//! Storage layer for learner artifacts.
//!
//! Every artifact is a JSON document stored under a string key, mirroring
//! the browser local-storage layout the front end already uses. The
//! [`KeyValueStore`] trait is the persistence port; [`SqliteStorage`] backs
//! the binary and [`MemoryStorage`] backs tests and embedded use.

mod memory;
mod sqlite;


pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{StorageError, StorageResult};

/// Key holding the global list of completed learning steps.
pub const PROGRESS_KEY: &str = "S1_progress";
/// Key holding the most recently visited learning page.
pub const LAST_PAGE_KEY: &str = "ControvLearn_lastLearningPage";
/// Key holding the learner's topic catalog (built-ins plus generated topics).
pub const TOPICS_KEY: &str = "ControvLearn_topics";

/// Kind of per-topic artifact, used to build `topic_<id>_<kind>` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicDataKind {
    /// Annotated claims.
    Claims,
    /// Annotated evidence.
    Evidences,
    /// Reasoning bridges between claims and evidence.
    ReasoningBridge,
    /// Whether the argument map panel is expanded.
    ShowArgumentMap,
    /// Initial intuition record.
    InitialIntuition,
    /// Perspective puzzle placements.
    PerspectiveMap,
    /// Simulated dialogue transcript.
    Dialogue,
    /// Metacognitive reflection answers.
    MetaReflection,
    /// Final stance review.
    StanceReview,
}

impl TopicDataKind {
    /// All kinds, in workflow order.
    pub const ALL: [TopicDataKind; 9] = [
        TopicDataKind::Claims,
        TopicDataKind::Evidences,
        TopicDataKind::ReasoningBridge,
        TopicDataKind::ShowArgumentMap,
        TopicDataKind::InitialIntuition,
        TopicDataKind::PerspectiveMap,
        TopicDataKind::Dialogue,
        TopicDataKind::MetaReflection,
        TopicDataKind::StanceReview,
    ];

    /// Key suffix for this kind.
    pub fn suffix(self) -> &'static str {
        match self {
            TopicDataKind::Claims => "claims",
            TopicDataKind::Evidences => "evidences",
            TopicDataKind::ReasoningBridge => "reasoning_bridge",
            TopicDataKind::ShowArgumentMap => "show_argument_map",
            TopicDataKind::InitialIntuition => "initial_intuition",
            TopicDataKind::PerspectiveMap => "perspective_map",
            TopicDataKind::Dialogue => "dialogue",
            TopicDataKind::MetaReflection => "meta_reflection",
            TopicDataKind::StanceReview => "stance_review",
        }
    }
}

/// Build the storage key for one artifact of one topic.
pub fn topic_key(topic_id: &str, kind: TopicDataKind) -> String {
    format!("topic_{}_{}", topic_id, kind.suffix())
}

/// Prefix shared by every key of one topic.
pub fn topic_prefix(topic_id: &str) -> String {
    format!("topic_{}_", topic_id)
}

/// Persistence port for learner state.
///
/// Values are read fully and overwritten fully; there are no partial
/// updates and no conflict detection.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Delete `key`; deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> StorageResult<()>;
    /// List keys starting with `prefix`, sorted.
    async fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>>;
}

/// Shared handle to a store, injected into every service.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Load and decode a JSON value.
///
/// A missing key yields `None`. A value that fails to decode is logged and
/// also yields `None`, so callers fall back to their default state.
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StorageResult<Option<T>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key = %key, error = %e, "Discarding malformed stored value");
            Ok(None)
        }
    }
}

/// Load a JSON value, falling back to `T::default()`.
pub async fn load_json_or_default<T: DeserializeOwned + Default>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StorageResult<T> {
    Ok(load_json(store, key).await?.unwrap_or_default())
}

/// Encode and store a JSON value, replacing whatever was there.
pub async fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Serialization {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store.set(key, &raw).await
}

/// Remove every artifact stored for one topic. Returns the removed keys.
pub async fn clear_topic(store: &dyn KeyValueStore, topic_id: &str) -> StorageResult<Vec<String>> {
    let keys = store.keys_with_prefix(&topic_prefix(topic_id)).await?;
    for key in &keys {
        store.remove(key).await?;
    }
    Ok(keys)
}
