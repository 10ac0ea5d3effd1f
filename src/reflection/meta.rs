//! Metacognitive reflection record.

use serde::{Deserialize, Deserializer, Serialize};

/// Rating given when a self-evaluation item is left alone.
pub const DEFAULT_RATING: u8 = 3;

/// The four open reflection prompts, in answer order.
pub const REFLECTION_QUESTIONS: [&str; 4] = [
    "初始判断的\"身份视角\"",
    "最初想法的依据与可能的片面性",
    "立场是否改变，以及改变/坚持的理由",
    "仍然存在的疑问与下一步打算",
];

/// Self-evaluation statements rated 1 (完全不同意) to 5 (完全同意).
pub const SELF_EVAL_STATEMENTS: [&str; 5] = [
    "我尝试从不同角色的角度来思考这个议题。",
    "在表达观点时，我有意识地引用了具体的事实或数据。",
    "我会留意自己有没有因为情绪或立场而忽略反对证据。",
    "当别人提出不同意见时，我愿意先弄清楚他的依据是什么。",
    "将来遇到类似科学争议，我知道自己大概会按照哪些步骤来判断信息。",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionAnswers {
    #[serde(default)]
    pub q1_identity_perspective: String,
    #[serde(default)]
    pub q2_initial_basis: String,
    #[serde(default)]
    pub q3_stance_change: String,
    #[serde(default)]
    pub q4_remaining_questions: String,
}

fn default_rating() -> u8 {
    DEFAULT_RATING
}

/// Clamp a rating into 1..=5. Non-finite input falls back to the default.
pub fn clamp_rating(value: f64) -> u8 {
    if value.is_finite() {
        value.round().clamp(1.0, 5.0) as u8
    } else {
        DEFAULT_RATING
    }
}

fn rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    Ok(clamp_rating(f64::deserialize(deserializer)?))
}

/// Five 1..=5 ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEvaluation {
    #[serde(default = "default_rating", deserialize_with = "rating")]
    pub q1: u8,
    #[serde(default = "default_rating", deserialize_with = "rating")]
    pub q2: u8,
    #[serde(default = "default_rating", deserialize_with = "rating")]
    pub q3: u8,
    #[serde(default = "default_rating", deserialize_with = "rating")]
    pub q4: u8,
    #[serde(default = "default_rating", deserialize_with = "rating")]
    pub q5: u8,
}

impl Default for SelfEvaluation {
    fn default() -> Self {
        Self::from_ratings([DEFAULT_RATING as f64; 5])
    }
}

impl SelfEvaluation {
    pub fn from_ratings(ratings: [f64; 5]) -> Self {
        let [q1, q2, q3, q4, q5] = ratings.map(clamp_rating);
        Self { q1, q2, q3, q4, q5 }
    }

    pub fn ratings(&self) -> [u8; 5] {
        [self.q1, self.q2, self.q3, self.q4, self.q5]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaReflectionResult {
    #[serde(default)]
    pub highlight_evidence_id: Option<String>,
    #[serde(default)]
    pub highlight_evidence_comment: String,
    #[serde(default)]
    pub reflection: ReflectionAnswers,
    #[serde(default)]
    pub self_eval: SelfEvaluation,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
}

/// What the learner did in steps 2 to 6, shown above the reflection form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningRecap {
    pub evidence_count: usize,
    pub bridged_count: usize,
    pub dialogue_rounds: usize,
    pub partner_label: String,
    pub lines: Vec<String>,
}

impl LearningRecap {
    /// `message_count` is the stored transcript length; two messages make a round.
    pub fn new(
        evidence_count: usize,
        bridged_count: usize,
        message_count: usize,
        partner_label: Option<&str>,
    ) -> Self {
        let dialogue_rounds = (message_count + 1) / 2;
        let partner_label = partner_label.unwrap_or("系统角色").to_string();
        let lines = vec![
            "背景阅读：已完成背景材料阅读，了解了相关事实、数据和研究".to_string(),
            "视角拼图：从多角度理解了不同立场的观点，分析了各方关注点".to_string(),
            format!(
                "论证解剖：共分析了 {} 条证据，其中 {} 条写了推理桥",
                evidence_count, bridged_count
            ),
            format!(
                "对话模拟：与「{}」进行了 {} 轮对话，练习了有理有据地表达观点",
                partner_label, dialogue_rounds
            ),
        ];
        Self {
            evidence_count,
            bridged_count,
            dialogue_rounds,
            partner_label,
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ratings_clamp() {
        let eval = SelfEvaluation::from_ratings([0.0, 7.0, 2.4, 4.6, f64::NAN]);
        assert_eq!(eval.ratings(), [1, 5, 2, 5, 3]);
    }

    #[test]
    fn test_deserialize_clamps_and_defaults() {
        let eval: SelfEvaluation = serde_json::from_str(r#"{"q1":9,"q2":-1,"q3":4}"#).unwrap();
        assert_eq!(eval.ratings(), [5, 1, 4, 3, 3]);
    }

    #[test]
    fn test_wire_format() {
        let result = MetaReflectionResult {
            highlight_evidence_id: None,
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["highlightEvidenceId"], serde_json::Value::Null);
        assert_eq!(json["reflection"]["q1IdentityPerspective"], "");
        assert_eq!(json["selfEval"]["q5"], 3);
    }

    #[test]
    fn test_recap_rounds_round_up() {
        let recap = LearningRecap::new(3, 1, 5, Some("当地渔民"));
        assert_eq!(recap.dialogue_rounds, 3);
        assert_eq!(recap.lines[2], "论证解剖：共分析了 3 条证据，其中 1 条写了推理桥");
        assert_eq!(
            recap.lines[3],
            "对话模拟：与「当地渔民」进行了 3 轮对话，练习了有理有据地表达观点"
        );

        let recap = LearningRecap::new(0, 0, 0, None);
        assert_eq!(recap.dialogue_rounds, 0);
        assert!(recap.lines[3].contains("「系统角色」"));
    }
}
