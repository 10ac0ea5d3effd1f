//! Scripted dialogue partner.
//!
//! Everything here is a pure lookup: the partner's opening line depends on
//! its default stance, and each reply depends only on the round and on
//! whether the learner's message showed reasoning or cited evidence.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::argument::Stance;

/// Number of learner turns the partner answers.
pub const MAX_ROUNDS: u32 = 3;

static REASONING_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new("因为|所以|数据|研究|证据").expect("valid reasoning regex"));

static CONNECTIVES: Lazy<Regex> = Lazy::new(|| {
    Regex::new("因为|所以|因此|所以说|由此可见|综上所述").expect("valid connective regex")
});

static EVIDENCE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([Ee]\d+)\]").expect("valid evidence tag regex"));

/// A role either side of the dialogue can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueRole {
    pub id: &'static str,
    pub label: &'static str,
    pub default_stance: Stance,
}

pub const DIALOGUE_ROLES: [DialogueRole; 6] = [
    DialogueRole { id: "student", label: "普通学生", default_stance: Stance::Neutral },
    DialogueRole { id: "fisher", label: "当地渔民", default_stance: Stance::Con },
    DialogueRole { id: "company", label: "电力公司工程师", default_stance: Stance::Pro },
    DialogueRole { id: "gov", label: "政府官员", default_stance: Stance::Conditional },
    DialogueRole { id: "ngo", label: "环保组织代表", default_stance: Stance::Con },
    DialogueRole { id: "scientist", label: "独立科学家", default_stance: Stance::Conditional },
];

pub const DEFAULT_USER_ROLE: &str = "student";
pub const DEFAULT_SYSTEM_ROLE: &str = "fisher";

pub const NO_CONNECTIVES_HINT: &str = "可以尝试用'因为…所以…'之类的表达，让推理更清晰";
pub const NO_EVIDENCE_HINT: &str = "你似乎还没有把前面分析到的证据放进对话中";
pub const SAME_STANCE_HINT: &str =
    "两个角色似乎代表了相同立场，你也可以尝试选择立场不同的角色进行练习";
pub const WELL_REASONED: &str = "你的对话看起来包含了很好的推理结构和证据支持！";

pub fn find_role(role_id: &str) -> Option<&'static DialogueRole> {
    DIALOGUE_ROLES.iter().find(|r| r.id == role_id)
}

/// Whether the text uses a reasoning word such as 因为 or 数据.
pub fn has_reasoning(text: &str) -> bool {
    REASONING_MARKERS.is_match(text)
}

/// Whether the text uses a causal connective.
pub fn has_connectives(text: &str) -> bool {
    CONNECTIVES.is_match(text)
}

/// Evidence ids cited as `[E<n>]` or `[e<n>]`, in order of appearance.
pub fn extract_evidence_tags(text: &str) -> Vec<String> {
    EVIDENCE_TAG
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Whether the text cites one of the known evidence ids verbatim.
pub fn cites_known_evidence<'a>(text: &str, mut evidence_ids: impl Iterator<Item = &'a str>) -> bool {
    evidence_ids.any(|id| text.contains(&format!("[{}]", id)))
}

/// The partner's first line.
///
/// A custom opinion wins over the stance template.
pub fn opening_statement(
    role: &DialogueRole,
    topic_title: &str,
    custom_opinion: &str,
) -> String {
    let custom = custom_opinion.trim();
    if !custom.is_empty() {
        return format!("{}：{}", role.label, custom);
    }

    let body = match role.default_stance {
        Stance::Pro => format!(
            "在当前议题\"{}\"下，我倾向于认为这是一个可行的选择。根据我了解的信息，这种做法有其科学依据和实际需求。你对这个问题有什么看法吗？",
            topic_title
        ),
        Stance::Con => format!(
            "我对\"{}\"这个问题持有保留意见。从我的专业角度来看，这种做法可能会带来一些潜在风险和负面影响。不知道你是否了解这些方面？",
            topic_title
        ),
        Stance::Conditional => format!(
            "关于\"{}\"，我的看法比较复杂。在满足一定条件的情况下，这种做法可能是可以接受的，但需要谨慎评估各种因素。你对这个问题有什么初步的看法吗？",
            topic_title
        ),
        Stance::Neutral => format!(
            "对于\"{}\"这个问题，我想先听听你的看法。你对这个争议有什么了解或感受吗？",
            topic_title
        ),
    };
    format!("{}：{}", role.label, body)
}

/// Canned reply for a round. Rounds at or past the last one get the closing line.
pub fn scripted_reply(round: u32, supported: bool, role_label: &str) -> String {
    let body = match (round, supported) {
        (0, _) => "谢谢你的分享。我认为这个问题确实值得深入探讨。",
        (1, true) => "我注意到你用了一些理由和证据来支持你的看法，这是很好的。不过，从我的角度来看，我仍然有些担忧。例如，你提到的这些证据是否考虑了长期影响？或者是否有其他研究得出了不同的结论？",
        (1, false) => "谢谢你分享你的观点。不过，我想了解更多细节。你能不能具体说明一下你依据的事实或数据？为什么你会有这样的看法呢？",
        (2, true) => "感谢你提供了更多信息和证据。这让我对你的观点有了更清晰的理解。不过，我还是想从另一个角度提出一些思考。例如，在资源有限的情况下，这种选择是否是最优的？或者是否有其他替代方案值得考虑？",
        (2, false) => "我理解你的立场，但仍然觉得缺乏足够具体的支持。在复杂的问题上，仅仅有态度是不够的，我们需要用事实和数据来支撑自己的观点。你是否可以再补充一些具体的依据？",
        _ => "经过这次讨论，我对你的观点有了更全面的了解。虽然我们可能在一些细节上仍有不同意见，但这种交流本身就是有价值的。通过交换不同的视角和证据，我们可以更全面地理解这个复杂的问题。谢谢你的分享！",
    };
    format!("{}：{}", role_label, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_table() {
        assert!(scripted_reply(1, true, "当地渔民").starts_with("当地渔民：我注意到你用了一些理由"));
        assert!(scripted_reply(1, false, "x").contains("具体说明一下"));
        assert!(scripted_reply(2, true, "x").contains("替代方案"));
        assert!(scripted_reply(2, false, "x").contains("仅仅有态度是不够的"));
    }

    #[test]
    fn test_late_rounds_always_close() {
        let closing = scripted_reply(3, false, "x");
        assert!(closing.contains("经过这次讨论"));
        assert_eq!(scripted_reply(3, true, "x"), closing);
        assert_eq!(scripted_reply(7, true, "x"), closing);
    }

    #[test]
    fn test_markers() {
        assert!(has_reasoning("我看过相关研究"));
        assert!(!has_reasoning("我就是不喜欢"));
        assert!(has_connectives("综上所述，可以接受"));
        assert!(!has_connectives("我看过数据"));
    }

    #[test]
    fn test_extract_evidence_tags() {
        assert_eq!(
            extract_evidence_tags("见 [E1] IAEA报告 和 [e12]，但不是 [X3] 或 [E]"),
            vec!["E1", "e12"]
        );
    }

    #[test]
    fn test_cites_known_evidence_is_exact() {
        let ids = ["E1", "E2"];
        assert!(cites_known_evidence("参考 [E2]", ids.iter().copied()));
        assert!(!cites_known_evidence("参考 [e2]", ids.iter().copied()));
        assert!(!cites_known_evidence("参考 [E3]", ids.iter().copied()));
    }

    #[test]
    fn test_opening_statement() {
        let fisher = find_role("fisher").unwrap();
        let text = opening_statement(fisher, "核污染水排海是否可接受？", "  ");
        assert!(text.starts_with("当地渔民：我对\"核污染水排海是否可接受？\"这个问题持有保留意见"));

        let text = opening_statement(fisher, "t", "排海会毁掉渔业");
        assert_eq!(text, "当地渔民：排海会毁掉渔业");
    }
}
