//! Learning progress.
//!
//! Completion is tracked globally, not per topic: finishing step 4 on one
//! topic unlocks step 5 on every topic. This matches the data already
//! written under `S1_progress` by existing clients.

mod steps;

pub use steps::{step_route, LearningStep, Route, StepInfo};

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{Topic, TopicCatalog};
use crate::error::{AppResult, LearningError};
use crate::storage::{
    load_json, load_json_or_default, save_json, SharedStore, LAST_PAGE_KEY, PROGRESS_KEY,
};

/// Stored list of completed step numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgress {
    #[serde(default)]
    pub completed_steps: Vec<u8>,
}

/// The learning page a learner most recently opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastVisitedLearningPage {
    pub topic_id: String,
    pub topic_title: String,
    pub step_id: u8,
    pub route_path: String,
    /// Milliseconds since the Unix epoch.
    pub visited_at: i64,
}

/// Result of entering a step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEntry {
    pub topic: Topic,
    pub step: StepInfo,
    pub completed_steps: Vec<u8>,
}

/// Per-step state shown in the workflow sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepStatus {
    #[serde(flatten)]
    pub info: StepInfo,
    pub completed: bool,
    pub unlocked: bool,
}

/// Step gating, completion tracking and last-visited bookkeeping.
#[derive(Clone)]
pub struct ProgressService {
    store: SharedStore,
    catalog: Arc<dyn TopicCatalog>,
}

impl ProgressService {
    pub fn new(store: SharedStore, catalog: Arc<dyn TopicCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Completed step numbers, in completion order.
    pub async fn completed_steps(&self) -> AppResult<Vec<u8>> {
        let progress: LearningProgress =
            load_json_or_default(self.store.as_ref(), PROGRESS_KEY).await?;
        Ok(progress.completed_steps)
    }

    pub async fn is_completed(&self, step: LearningStep) -> AppResult<bool> {
        Ok(self.completed_steps().await?.contains(&step.number()))
    }

    /// Step 1 is always open; every other step needs its predecessor.
    pub async fn is_unlocked(&self, step: LearningStep) -> AppResult<bool> {
        match step.previous() {
            None => Ok(true),
            Some(previous) => self.is_completed(previous).await,
        }
    }

    /// Mark a step complete. Marking twice is a no-op.
    pub async fn mark_completed(&self, step: LearningStep) -> AppResult<()> {
        let mut steps = self.completed_steps().await?;
        if steps.contains(&step.number()) {
            return Ok(());
        }
        steps.push(step.number());
        save_json(
            self.store.as_ref(),
            PROGRESS_KEY,
            &LearningProgress {
                completed_steps: steps,
            },
        )
        .await?;
        debug!(step = step.number(), "Marked step completed");
        Ok(())
    }

    pub async fn last_visited(&self) -> AppResult<Option<LastVisitedLearningPage>> {
        Ok(load_json(self.store.as_ref(), LAST_PAGE_KEY).await?)
    }

    async fn record_visit(&self, topic: &Topic, step: LearningStep) -> AppResult<()> {
        let page = LastVisitedLearningPage {
            topic_id: topic.id.clone(),
            topic_title: topic.title.clone(),
            step_id: step.number(),
            route_path: step.route_path(&topic.id),
            visited_at: Utc::now().timestamp_millis(),
        };
        save_json(self.store.as_ref(), LAST_PAGE_KEY, &page).await?;
        Ok(())
    }

    async fn gate(&self, step: LearningStep) -> AppResult<()> {
        if let Some(previous) = step.previous() {
            if !self.is_completed(previous).await? {
                return Err(LearningError::StepLocked {
                    step: step.number(),
                    required: previous.number(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Open a step of a topic.
    ///
    /// Steps 1 to 7 count as completed as soon as they are opened; the
    /// review step completes only through [`ProgressService::complete_topic`].
    /// A locked step leaves progress and the last-visited page untouched.
    pub async fn enter_step(&self, topic_id: &str, step_number: u8) -> AppResult<StepEntry> {
        let topic = self.catalog.require(topic_id).await?;
        let step = LearningStep::from_number(step_number)
            .ok_or(LearningError::UnknownStep { step: step_number })?;

        self.gate(step).await?;

        if step != LearningStep::PositionReview {
            self.mark_completed(step).await?;
        }
        self.record_visit(&topic, step).await?;

        info!(topic_id = %topic.id, step = step.number(), "Entered learning step");
        Ok(StepEntry {
            step: step.info(&topic.id),
            completed_steps: self.completed_steps().await?,
            topic,
        })
    }

    /// Finish the workflow for a topic by completing the review step.
    pub async fn complete_topic(&self, topic_id: &str) -> AppResult<Vec<u8>> {
        let topic = self.catalog.require(topic_id).await?;
        self.gate(LearningStep::PositionReview).await?;
        self.mark_completed(LearningStep::PositionReview).await?;
        info!(topic_id = %topic.id, "Completed learning workflow");
        self.completed_steps().await
    }

    /// Status of every step for one topic.
    pub async fn step_status(&self, topic_id: &str) -> AppResult<Vec<StepStatus>> {
        let topic = self.catalog.require(topic_id).await?;
        let completed = self.completed_steps().await?;

        Ok(LearningStep::ALL
            .iter()
            .map(|step| StepStatus {
                info: step.info(&topic.id),
                completed: completed.contains(&step.number()),
                unlocked: step
                    .previous()
                    .map_or(true, |p| completed.contains(&p.number())),
            })
            .collect())
    }
}
