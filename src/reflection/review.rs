//! Stance review: where the learner ended up, and how far they moved.

use serde::{Deserialize, Serialize};

use super::meta::MetaReflectionResult;
use crate::intuition::{stance_label, IntuitionValue, DEFAULT_SCORE};

/// Movement larger than this counts as a change of stance.
pub const MOVEMENT_THRESHOLD: i32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialStance {
    pub value: IntuitionValue,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalStance {
    pub value: u8,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectorySummary {
    pub label_initial: String,
    pub label_final: String,
    pub diff: i32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StanceReviewResult {
    pub initial: InitialStance,
    #[serde(rename = "final")]
    pub final_stance: FinalStance,
    pub trajectory_summary: TrajectorySummary,
    #[serde(default)]
    pub summary_text: String,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
}

/// Describe the move from the initial to the final stance.
///
/// An undecided start has no distance, so it always reads as "stayed near".
pub fn trajectory(initial: IntuitionValue, final_value: u8) -> TrajectorySummary {
    let label_initial = stance_label(initial);
    let label_final = stance_label(IntuitionValue::Score(final_value));
    let diff = match initial {
        IntuitionValue::Score(v) => i32::from(final_value) - i32::from(v),
        IntuitionValue::Undecided => 0,
    };

    let text = if diff.abs() > MOVEMENT_THRESHOLD {
        format!(
            "你的立场从\"{}\"移动到了\"{}\"。这说明在学习过程中，你接触到的信息和思考让你对该议题有了不同的理解。",
            label_initial, label_final
        )
    } else {
        format!(
            "你的立场在活动前后保持在\"{}\"的附近。不过，你可以尝试回顾：现在的你，是否拥有了更多用来解释这一立场的理由或证据？",
            label_initial
        )
    };

    TrajectorySummary {
        label_initial: label_initial.to_string(),
        label_final: label_final.to_string(),
        diff,
        text,
    }
}

fn or_default<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => fallback,
    }
}

/// Everything the summary draft is templated from.
#[derive(Debug, Clone, Copy)]
pub struct DraftInputs<'a> {
    pub topic_title: Option<&'a str>,
    pub initial: Option<IntuitionValue>,
    pub final_value: u8,
    pub final_comment: &'a str,
    pub reflection: Option<&'a MetaReflectionResult>,
}

/// Five-paragraph learning summary. Missing pieces get stock sentences.
pub fn summary_draft(inputs: DraftInputs<'_>) -> String {
    let initial_label =
        stance_label(inputs.initial.unwrap_or(IntuitionValue::Score(DEFAULT_SCORE)));
    let final_label = stance_label(IntuitionValue::Score(inputs.final_value));

    let answers = inputs.reflection.map(|r| &r.reflection);
    let identity = or_default(
        answers.map(|a| a.q1_identity_perspective.as_str()),
        "一个普通学习者",
    );
    let basis = or_default(
        answers.map(|a| a.q2_initial_basis.as_str()),
        "一些零散的新闻、他人的看法和自己的直觉",
    );
    let trigger = or_default(
        answers.map(|a| a.q3_stance_change.as_str()),
        "在阅读材料、分析论证和进行对话的过程中，我看到了比之前更多的证据和不同角度的观点",
    );
    let highlight = or_default(
        inputs.reflection.map(|r| r.highlight_evidence_comment.as_str()),
        "其中有一两条证据让我印象特别深，它们让我重新思考了原来的看法",
    );
    let remaining = or_default(
        answers.map(|a| a.q4_remaining_questions.as_str()),
        "还有一些细节问题和长期影响，我觉得有必要在今后继续关注",
    );
    let final_comment = or_default(
        Some(inputs.final_comment),
        "现在的立场是经过本次学习后形成的，我会尝试用更充分的理由来说明自己的看法。",
    );
    let topic = or_default(inputs.topic_title, "这个议题");

    [
        format!(
            "在本次关于\"{}\"的学习中，我一开始是以{}的身份来思考问题，当时的立场大致是\"{}\"。我的初始判断主要依据是：{}。",
            topic, identity, initial_label, basis
        ),
        format!(
            "{}。这些经历让我的思考更加细致，不再只是停留在单一的角度。",
            trigger
        ),
        format!(
            "现在，我的立场是\"{}\"。我会用{}等理由来支持自己的看法。",
            final_label, highlight
        ),
        format!("总体来说，{}", final_comment),
        format!(
            "同时，我仍然对{}保持关注，希望以后能通过查阅更多资料或向相关专业人士请教来加深理解。",
            remaining
        ),
    ]
    .join("\n\n")
}
