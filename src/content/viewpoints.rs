//! Annotatable viewpoint passages, one set per topic.

use super::{Sentence, Viewpoint, ViewpointPosition};

struct ViewpointDef {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    position: ViewpointPosition,
    sentences: &'static [(&'static str, &'static str)],
}

const DISCHARGE: &[ViewpointDef] = &[
    ViewpointDef {
        id: "viewpointA",
        title: "支持排海计划",
        description: "来自东京电力公司专家的观点",
        position: ViewpointPosition::Support,
        sentences: &[
            ("s1", "福岛核事故已经过去十多年，处理核污染水是一个迫在眉睫的问题。"),
            ("s2", "我们已经采用了先进的ALPS处理系统，能够去除水中62种放射性核素，仅保留氚。"),
            ("s3", "根据国际原子能机构(IAEA)的评估报告，我们的排海计划符合国际安全标准。"),
            ("s4", "氚的浓度远低于世界卫生组织设定的饮用水标准，不会对海洋环境造成显著影响。"),
            ("s5", "实际上，全球有20多个核电站都在以类似的方式排放含氚废水，这是行业通行做法。"),
            ("s6", "如果继续储存在罐子里，不仅空间有限，还存在地震等自然灾害风险。"),
            ("s7", "我们理解公众的担忧，但科学数据表明排海是当前最安全、最可行的选择。"),
        ],
    },
    ViewpointDef {
        id: "viewpointB",
        title: "反对排海计划",
        description: "来自环保组织代表的观点",
        position: ViewpointPosition::Oppose,
        sentences: &[
            ("s8", "核污染水排海不是一个简单的技术问题，而是关系到全球海洋环境和人类健康的重大决策。"),
            ("s9", "虽然ALPS系统能够处理大部分核素，但仍有一些放射性物质无法完全去除。"),
            ("s10", "即使浓度符合标准，持续30年的排放累积效应不容忽视。"),
            ("s11", "福岛附近海域的渔业已经开始恢复，排海计划可能导致消费者信心再次崩溃。"),
            ("s12", "我们需要更谨慎的态度，考虑其他替代方案，如蒸汽释放或地层注入。"),
            ("s13", "这不仅仅是日本的问题，因为海洋是全人类的共同财产。"),
            ("s14", "IAEA的报告也承认存在不确定性，特别是长期环境影响方面。"),
        ],
    },
    ViewpointDef {
        id: "viewpointC",
        title: "谨慎支持，需附加条件",
        description: "来自独立科学家的观点",
        position: ViewpointPosition::Conditional,
        sentences: &[
            ("s15", "从纯技术角度看，经过处理的核污染水排海可能是目前可行的选择之一。"),
            ("s16", "但我们必须看到，这个决定面临着科学、政治、经济和伦理等多方面的挑战。"),
            ("s17", "首先，必须确保所有数据的透明度，让国际社会能够独立验证。"),
            ("s18", "其次，需要建立长期的监测机制，追踪可能的环境影响。"),
            ("s19", "最重要的是，应该充分听取利益相关方的意见，特别是渔民和周边国家的担忧。"),
            ("s20", "科学评估是必要的，但决策不能仅仅基于科学因素，还需要考虑社会接受度。"),
            ("s21", "在当前技术条件下，如果能够满足上述条件，排海或许是权衡后的选择，但绝不是最优解。"),
        ],
    },
];

const AI_JOBS: &[ViewpointDef] = &[
    ViewpointDef {
        id: "viewpointA",
        title: "AI将创造更多就业机会",
        description: "来自乐观派专家的观点",
        position: ViewpointPosition::Support,
        sentences: &[
            ("s1", "历史告诉我们，每一次技术革命都会创造新的就业机会，AI也不例外。"),
            ("s2", "虽然AI会取代一些重复性工作，但同时会创造大量与AI开发、维护和应用相关的新岗位。"),
            ("s3", "麦肯锡的研究表明，到2030年，AI可能创造的就业机会比摧毁的还要多。"),
            ("s4", "就像互联网带来了程序员、数据分析师等新职业一样，AI也会带来我们现在无法想象的新工作。"),
            ("s5", "关键不是阻止技术发展，而是调整教育体系，培养适应AI时代的技能，如创造力和批判性思维。"),
            ("s6", "AI更多是作为工具增强人类能力，而不是完全替代人类。"),
        ],
    },
    ViewpointDef {
        id: "viewpointB",
        title: "AI将导致大规模失业",
        description: "来自担忧派专家的观点",
        position: ViewpointPosition::Oppose,
        sentences: &[
            ("s7", "这次技术革命与以往不同，AI可能会影响到更多的职业类型，包括一些高技能工作。"),
            ("s8", "牛津大学的一项研究预测，未来20年内，美国约47%的工作有被自动化取代的风险。"),
            ("s9", "生成式AI的出现，正在威胁到写作、设计、编程等创造性工作。"),
            ("s10", "虽然新工作会被创造，但转型的过程可能会非常痛苦，导致大量结构性失业。"),
            ("s11", "低收入工人和受教育程度较低的群体可能会受到更严重的冲击。"),
            ("s12", "我们需要认真考虑如何通过政策和社会保障来缓解这一转变带来的社会问题。"),
        ],
    },
];

const GENERIC: &[ViewpointDef] = &[
    ViewpointDef {
        id: "viewpointA",
        title: "支持方观点",
        description: "对该做法的支持意见",
        position: ViewpointPosition::Support,
        sentences: &[
            ("s1", "我认为这一做法总体上是利大于弊的，值得尝试。"),
            ("s2", "根据最近的研究数据，相关指标确实有了明显改善。"),
            ("s3", "很多专家也表示这是目前可行的解决方案之一。"),
            ("s4", "虽然存在一些风险，但与其什么都不做，不如积极探索。"),
            ("s5", "其他地区已经有成功案例，我们可以借鉴他们的经验。"),
        ],
    },
    ViewpointDef {
        id: "viewpointB",
        title: "反对方观点",
        description: "对该做法的反对意见",
        position: ViewpointPosition::Oppose,
        sentences: &[
            ("s6", "我认为现在实施这一做法还为时过早，存在很多不确定性。"),
            ("s7", "现有的数据样本太小，不足以支持如此重大的决策。"),
            ("s8", "一些研究也指出了潜在的风险，但被忽视了。"),
            ("s9", "我们不能因为急于求成而忽视可能的长期负面影响。"),
            ("s10", "在没有充分准备的情况下贸然推进，可能会导致不可挽回的后果。"),
        ],
    },
];

fn defs_for(topic_id: &str) -> &'static [ViewpointDef] {
    match topic_id {
        "1" => DISCHARGE,
        "2" => AI_JOBS,
        _ => GENERIC,
    }
}

/// Viewpoint passages for a topic; topics without their own set share a generic one.
pub fn viewpoints(topic_id: &str) -> Vec<Viewpoint> {
    defs_for(topic_id)
        .iter()
        .map(|def| Viewpoint {
            id: def.id.to_string(),
            title: def.title.to_string(),
            description: def.description.to_string(),
            position: def.position,
            sentences: def
                .sentences
                .iter()
                .map(|(id, text)| Sentence {
                    id: id.to_string(),
                    text: text.to_string(),
                    viewpoint_id: def.id.to_string(),
                })
                .collect(),
        })
        .collect()
}

/// Find one sentence across all viewpoints of a topic.
pub fn find_sentence(topic_id: &str, sentence_id: &str) -> Option<Sentence> {
    defs_for(topic_id).iter().find_map(|def| {
        def.sentences
            .iter()
            .find(|(id, _)| *id == sentence_id)
            .map(|(id, text)| Sentence {
                id: id.to_string(),
                text: text.to_string(),
                viewpoint_id: def.id.to_string(),
            })
    })
}
