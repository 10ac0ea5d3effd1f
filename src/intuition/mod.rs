//! Initial intuition and stance labels.
//!
//! A stance is a 0..=100 slider value or an explicit "undecided". The same
//! value type is reused by the stance review at the end of the workflow.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::catalog::TopicCatalog;
use crate::error::{AppResult, LearningError};
use crate::storage::{load_json, save_json, topic_key, SharedStore, TopicDataKind};

/// Toast shown when an earlier record is loaded.
pub const LOADED_NOTICE: &str = "已找到之前的记录，可以随时修改";

/// Slider position used when nothing has been recorded.
pub const DEFAULT_SCORE: u8 = 50;

/// A stance on the 0..=100 scale, or no stance at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntuitionValue {
    Score(u8),
    Undecided,
}

impl IntuitionValue {
    /// Build a score, rejecting values above 100.
    pub fn score(value: u8) -> Result<Self, LearningError> {
        if value > 100 {
            return Err(LearningError::Validation {
                field: "value".to_string(),
                reason: format!("stance value {} is outside 0..=100", value),
            });
        }
        Ok(IntuitionValue::Score(value))
    }

    pub fn as_score(self) -> Option<u8> {
        match self {
            IntuitionValue::Score(v) => Some(v),
            IntuitionValue::Undecided => None,
        }
    }

    pub fn is_undecided(self) -> bool {
        matches!(self, IntuitionValue::Undecided)
    }
}

impl Default for IntuitionValue {
    fn default() -> Self {
        IntuitionValue::Score(DEFAULT_SCORE)
    }
}

impl fmt::Display for IntuitionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntuitionValue::Score(v) => write!(f, "{}", v),
            IntuitionValue::Undecided => f.write_str("undecided"),
        }
    }
}

impl Serialize for IntuitionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            IntuitionValue::Score(v) => serializer.serialize_u8(*v),
            IntuitionValue::Undecided => serializer.serialize_str("undecided"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for IntuitionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawValue::deserialize(deserializer)? {
            RawValue::Number(n) if (0.0..=100.0).contains(&n) => {
                Ok(IntuitionValue::Score(n.round() as u8))
            }
            RawValue::Number(n) => Err(serde::de::Error::custom(format!(
                "stance value {} is outside 0..=100",
                n
            ))),
            RawValue::Text(s) if s == "undecided" => Ok(IntuitionValue::Undecided),
            RawValue::Text(s) => Err(serde::de::Error::custom(format!(
                "expected a number or \"undecided\", got {:?}",
                s
            ))),
        }
    }
}

/// Six-bin stance label used by the review step.
///
/// Bins are half-open on the upper side, so 20, 40, 60 and 80 fall into
/// the higher bin.
pub fn stance_label(value: IntuitionValue) -> &'static str {
    match value {
        IntuitionValue::Undecided => "未决定",
        IntuitionValue::Score(v) if v < 20 => "强烈反对",
        IntuitionValue::Score(v) if v < 40 => "比较反对",
        IntuitionValue::Score(v) if v < 60 => "模棱两可",
        IntuitionValue::Score(v) if v < 80 => "比较赞成",
        IntuitionValue::Score(_) => "强烈赞成",
    }
}

/// Sentence shown under the slider on the intuition page.
pub fn intuition_description(value: IntuitionValue) -> &'static str {
    match value {
        IntuitionValue::Undecided => "你当前的状态：暂不表态，这也是一种有效记录。",
        IntuitionValue::Score(v) if v < 30 => "你当前的直觉：明显偏向担忧风险",
        IntuitionValue::Score(v) if v < 40 => "你当前的直觉：比较担忧风险",
        IntuitionValue::Score(v) if v < 60 => "你当前的直觉：比较居中，还没想好",
        IntuitionValue::Score(v) if v < 70 => "你当前的直觉：比较相信风险可控",
        IntuitionValue::Score(_) => "你当前的直觉：明显相信风险可控",
    }
}

/// Stored first reaction to a topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialIntuitionData {
    pub value: IntuitionValue,
    #[serde(default)]
    pub note: String,
}

/// Intuition record with its derived texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntuitionView {
    pub topic_id: String,
    #[serde(flatten)]
    pub data: InitialIntuitionData,
    pub description: &'static str,
    pub label: &'static str,
    /// Set when an earlier record was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

impl IntuitionView {
    fn new(topic_id: &str, data: InitialIntuitionData, loaded: bool) -> Self {
        Self {
            topic_id: topic_id.to_string(),
            description: intuition_description(data.value),
            label: stance_label(data.value),
            notice: loaded.then_some(LOADED_NOTICE),
            data,
        }
    }
}

/// Saves and loads the initial intuition of each topic.
#[derive(Clone)]
pub struct IntuitionService {
    store: SharedStore,
    catalog: Arc<dyn TopicCatalog>,
}

impl IntuitionService {
    pub fn new(store: SharedStore, catalog: Arc<dyn TopicCatalog>) -> Self {
        Self { store, catalog }
    }

    /// The stored record, if any.
    pub async fn load(&self, topic_id: &str) -> AppResult<Option<InitialIntuitionData>> {
        Ok(load_json(
            self.store.as_ref(),
            &topic_key(topic_id, TopicDataKind::InitialIntuition),
        )
        .await?)
    }

    /// The stored record or the default slider state.
    pub async fn get(&self, topic_id: &str) -> AppResult<IntuitionView> {
        self.catalog.require(topic_id).await?;
        let view = match self.load(topic_id).await? {
            Some(data) => IntuitionView::new(topic_id, data, true),
            None => IntuitionView::new(topic_id, InitialIntuitionData::default(), false),
        };
        Ok(view)
    }

    /// Overwrite the record of a topic.
    pub async fn save(
        &self,
        topic_id: &str,
        value: IntuitionValue,
        note: &str,
    ) -> AppResult<IntuitionView> {
        self.catalog.require(topic_id).await?;
        let data = InitialIntuitionData {
            value,
            note: note.to_string(),
        };
        save_json(
            self.store.as_ref(),
            &topic_key(topic_id, TopicDataKind::InitialIntuition),
            &data,
        )
        .await?;

        debug!(topic_id = %topic_id, value = %value, "Saved initial intuition");
        Ok(IntuitionView::new(topic_id, data, false))
    }
}
