//! Built-in controversy topics shipped with every installation.

use super::{Difficulty, Topic, TopicSource};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn builtin(
    id: &str,
    title: &str,
    description: &str,
    tags: &[&str],
    difficulty: Difficulty,
    duration: u32,
    subject_tags: &[&str],
    controversy_type: &[&str],
) -> Topic {
    Topic {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        tags: strings(tags),
        difficulty,
        duration,
        is_ai_generated: None,
        subject_tags: strings(subject_tags),
        controversy_type: strings(controversy_type),
        source: TopicSource::Default,
    }
}

/// The six default topics, in catalog order.
pub fn builtin_topics() -> Vec<Topic> {
    vec![
        builtin(
            "1",
            "核污染水排海是否可接受？",
            "探讨核污染水排海的科学依据、环境影响和国际争议",
            &["环境", "科技伦理"],
            Difficulty::Advanced,
            35,
            &["环境科学", "工程技术"],
            &["科学不确定性", "风险评估", "价值冲突"],
        ),
        builtin(
            "2",
            "人工智能是否会取代人类工作？",
            "分析AI技术发展对就业市场的影响和未来职业趋势",
            &["AI技术", "就业"],
            Difficulty::Beginner,
            25,
            &["计算机科学", "经济学"],
            &["技术影响", "社会结构变化", "就业政策"],
        ),
        builtin(
            "3",
            "基因编辑技术的伦理边界在哪里？",
            "讨论CRISPR等基因编辑技术的应用前景和伦理挑战",
            &["生物技术", "伦理"],
            Difficulty::Advanced,
            40,
            &["生物学", "医学伦理学"],
            &["伦理边界", "技术风险", "社会公平"],
        ),
        builtin(
            "4",
            "新能源汽车是否真的环保？",
            "从全生命周期角度评估新能源汽车的环境影响",
            &["环境", "可持续发展"],
            Difficulty::Beginner,
            20,
            &["环境科学", "能源工程"],
            &["生命周期评估", "资源利用效率", "技术发展路径"],
        ),
        builtin(
            "5",
            "社交媒体是否损害了青少年的心理健康？",
            "研究社交媒体使用与青少年心理健康之间的关系",
            &["心理健康", "社会影响"],
            Difficulty::Beginner,
            30,
            &["心理学", "社会学"],
            &["行为研究", "心理健康影响", "教育干预"],
        ),
        builtin(
            "6",
            "大数据时代的个人隐私该如何保护？",
            "探讨数据收集、使用和保护的平衡问题",
            &["数据隐私", "科技伦理"],
            Difficulty::Advanced,
            35,
            &["法学", "信息技术"],
            &["数据权利", "技术实现", "法律监管"],
        ),
    ]
}

/// Id reserved for the single mock-generated topic.
pub const GENERATED_TOPIC_ID: &str = "ai-euthanasia-01";

/// The fixed draft returned by mock topic generation.
pub fn generated_draft(difficulty: Difficulty) -> (String, String, Vec<String>, u32) {
    let duration = match difficulty {
        Difficulty::Beginner => 25,
        Difficulty::Advanced => 40,
    };
    (
        "安乐死是否应该合法化？".to_string(),
        "围绕尊严死亡与生命价值展开的公共争议".to_string(),
        strings(&["医疗伦理", "AI生成"]),
        duration,
    )
}
