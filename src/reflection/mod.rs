//! Metacognitive reflection and stance review (steps 7 and 8).

mod meta;
mod review;

pub use meta::{
    clamp_rating, LearningRecap, MetaReflectionResult, ReflectionAnswers,
    SelfEvaluation, DEFAULT_RATING, REFLECTION_QUESTIONS, SELF_EVAL_STATEMENTS,
};
pub use review::{
    summary_draft, trajectory, DraftInputs, FinalStance, InitialStance, StanceReviewResult,
    TrajectorySummary, MOVEMENT_THRESHOLD,
};

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::argument::{build_records, ArgumentService};
use crate::catalog::TopicCatalog;
use crate::dialogue::{find_role, DialogueData};
use crate::error::{AppResult, LearningError};
use crate::intuition::{IntuitionService, IntuitionValue, DEFAULT_SCORE};
use crate::progress::{LearningStep, ProgressService};
use crate::storage::{load_json, save_json, topic_key, SharedStore, TopicDataKind};

pub const REFLECTION_SAVED_NOTICE: &str = "反思记录已保存";
pub const REVIEW_SAVED_NOTICE: &str = "立场回顾已保存";
pub const TOPIC_COMPLETED_NOTICE: &str = "已完成本议题学习";

/// Answers submitted from the reflection form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionInput {
    #[serde(default)]
    pub highlight_evidence_id: Option<String>,
    #[serde(default)]
    pub highlight_evidence_comment: String,
    #[serde(default)]
    pub reflection: ReflectionAnswers,
    #[serde(default)]
    pub self_eval: SelfEvaluation,
}

/// Reflection form state with the recap of earlier steps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionView {
    pub topic_id: String,
    pub stored: bool,
    pub reflection: MetaReflectionResult,
    pub recap: LearningRecap,
    pub questions: [&'static str; 4],
    pub self_eval_statements: [&'static str; 5],
}

/// Final stance chosen on the review page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    #[serde(default)]
    pub final_value: Option<u8>,
    #[serde(default)]
    pub final_comment: Option<String>,
    /// Learner-edited summary. Empty means use the generated draft.
    #[serde(default)]
    pub summary_text: Option<String>,
}

/// Review page state before saving.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub topic_id: String,
    pub initial: InitialStance,
    #[serde(rename = "final")]
    pub final_stance: FinalStance,
    pub trajectory_summary: TrajectorySummary,
    pub summary_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<StanceReviewResult>,
}

/// Outcome of finishing a topic.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicCompletion {
    pub review: StanceReviewResult,
    pub completed_steps: Vec<u8>,
    pub notice: &'static str,
}

fn validate_final_value(value: u8) -> AppResult<u8> {
    IntuitionValue::score(value)?;
    Ok(value)
}

/// Steps 7 and 8: reflection answers, stance review and topic completion.
#[derive(Clone)]
pub struct ReflectionService {
    store: SharedStore,
    catalog: Arc<dyn TopicCatalog>,
    arguments: ArgumentService,
    intuition: IntuitionService,
    progress: ProgressService,
}

impl ReflectionService {
    pub fn new(
        store: SharedStore,
        catalog: Arc<dyn TopicCatalog>,
        arguments: ArgumentService,
        intuition: IntuitionService,
        progress: ProgressService,
    ) -> Self {
        Self {
            store,
            catalog,
            arguments,
            intuition,
            progress,
        }
    }

    async fn load_reflection(&self, topic_id: &str) -> AppResult<Option<MetaReflectionResult>> {
        Ok(load_json(
            self.store.as_ref(),
            &topic_key(topic_id, TopicDataKind::MetaReflection),
        )
        .await?)
    }

    pub async fn load_review(&self, topic_id: &str) -> AppResult<Option<StanceReviewResult>> {
        Ok(load_json(
            self.store.as_ref(),
            &topic_key(topic_id, TopicDataKind::StanceReview),
        )
        .await?)
    }

    async fn recap(&self, topic_id: &str) -> AppResult<LearningRecap> {
        let set = self.arguments.load(topic_id).await?;
        let records = build_records(&set);
        let bridged = records.iter().filter(|r| r.bridge_text.is_some()).count();

        let dialogue: Option<DialogueData> =
            load_json(self.store.as_ref(), &topic_key(topic_id, TopicDataKind::Dialogue)).await?;
        let (messages, partner) = match &dialogue {
            Some(d) => (
                d.messages.len(),
                Some(find_role(&d.roles.system).map_or(d.roles.system.as_str(), |r| r.label)),
            ),
            None => (0, None),
        };

        Ok(LearningRecap::new(records.len(), bridged, messages, partner))
    }

    pub async fn get_reflection(&self, topic_id: &str) -> AppResult<ReflectionView> {
        self.catalog.require(topic_id).await?;
        let stored = self.load_reflection(topic_id).await?;
        Ok(ReflectionView {
            topic_id: topic_id.to_string(),
            stored: stored.is_some(),
            reflection: stored.unwrap_or_default(),
            recap: self.recap(topic_id).await?,
            questions: REFLECTION_QUESTIONS,
            self_eval_statements: SELF_EVAL_STATEMENTS,
        })
    }

    /// Overwrite the reflection of a topic.
    ///
    /// A highlighted evidence must be one the learner annotated.
    pub async fn save_reflection(
        &self,
        topic_id: &str,
        input: ReflectionInput,
    ) -> AppResult<MetaReflectionResult> {
        self.catalog.require(topic_id).await?;

        let highlight = input
            .highlight_evidence_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        if let Some(evidence_id) = &highlight {
            let set = self.arguments.load(topic_id).await?;
            if set.evidence(evidence_id).is_none() {
                return Err(LearningError::EvidenceNotFound {
                    evidence_id: evidence_id.clone(),
                }
                .into());
            }
        }

        let result = MetaReflectionResult {
            highlight_evidence_id: highlight,
            highlight_evidence_comment: input.highlight_evidence_comment,
            reflection: input.reflection,
            self_eval: input.self_eval,
            timestamp: Utc::now().timestamp_millis(),
        };
        save_json(
            self.store.as_ref(),
            &topic_key(topic_id, TopicDataKind::MetaReflection),
            &result,
        )
        .await?;

        debug!(topic_id = %topic_id, ratings = ?result.self_eval.ratings(), "Saved meta reflection");
        Ok(result)
    }

    /// Build the review page: initial stance, a final stance, the
    /// trajectory and a summary draft.
    pub async fn review_draft(&self, topic_id: &str, input: &ReviewInput) -> AppResult<ReviewDraft> {
        let topic = self.catalog.require(topic_id).await?;

        let intuition = self.intuition.load(topic_id).await?;
        let reflection = self.load_reflection(topic_id).await?;
        let saved = self.load_review(topic_id).await?;

        // Nothing recorded yet: start from the neutral default.
        let initial = match intuition {
            Some(data) => InitialStance {
                value: data.value,
                comment: data.note,
            },
            None => InitialStance {
                value: IntuitionValue::Score(DEFAULT_SCORE),
                comment: String::new(),
            },
        };

        let final_value = match input.final_value {
            Some(v) => validate_final_value(v)?,
            None => saved
                .as_ref()
                .map(|r| r.final_stance.value)
                .or_else(|| initial.value.as_score())
                .unwrap_or(DEFAULT_SCORE),
        };
        let final_comment = input
            .final_comment
            .clone()
            .or_else(|| saved.as_ref().map(|r| r.final_stance.comment.clone()))
            .unwrap_or_default();

        let untouched = input.final_value.is_none() && input.final_comment.is_none();
        let summary_text = match (&saved, untouched) {
            (Some(review), true) if !review.summary_text.trim().is_empty() => {
                review.summary_text.clone()
            }
            _ => summary_draft(DraftInputs {
                topic_title: Some(&topic.title),
                initial: Some(initial.value),
                final_value,
                final_comment: &final_comment,
                reflection: reflection.as_ref(),
            }),
        };

        Ok(ReviewDraft {
            topic_id: topic_id.to_string(),
            trajectory_summary: trajectory(initial.value, final_value),
            initial,
            final_stance: FinalStance {
                value: final_value,
                comment: final_comment,
            },
            summary_text,
            saved,
        })
    }

    /// Save the stance review. An empty summary is replaced by the draft.
    pub async fn save_review(
        &self,
        topic_id: &str,
        input: ReviewInput,
    ) -> AppResult<StanceReviewResult> {
        let draft = self.review_draft(topic_id, &input).await?;
        let summary_text = match input.summary_text {
            Some(text) if !text.trim().is_empty() => text,
            _ => draft.summary_text,
        };

        let result = StanceReviewResult {
            initial: draft.initial,
            final_stance: draft.final_stance,
            trajectory_summary: draft.trajectory_summary,
            summary_text,
            timestamp: Utc::now().timestamp_millis(),
        };
        save_json(
            self.store.as_ref(),
            &topic_key(topic_id, TopicDataKind::StanceReview),
            &result,
        )
        .await?;

        info!(
            topic_id = %topic_id,
            diff = result.trajectory_summary.diff,
            "Saved stance review"
        );
        Ok(result)
    }

    /// Save the review and complete step 8.
    ///
    /// Nothing is saved while the review step is still locked.
    pub async fn complete_topic(
        &self,
        topic_id: &str,
        input: ReviewInput,
    ) -> AppResult<TopicCompletion> {
        self.catalog.require(topic_id).await?;
        if !self.progress.is_unlocked(LearningStep::PositionReview).await? {
            return Err(LearningError::StepLocked {
                step: LearningStep::PositionReview.number(),
                required: LearningStep::MetaCognition.number(),
            }
            .into());
        }

        let review = self.save_review(topic_id, input).await?;
        let completed_steps = self.progress.complete_topic(topic_id).await?;
        Ok(TopicCompletion {
            review,
            completed_steps,
            notice: TOPIC_COMPLETED_NOTICE,
        })
    }
}

#[cfg(test)]
#[path = "reflection_tests.rs"]
mod reflection_tests;
