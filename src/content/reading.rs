//! Background stories and guiding questions for the reading step.

use crate::catalog::Topic;

const DISCHARGE_STORY: &str = "2023年春夏之交，福岛海岸的风有些不同寻常。渔民田中先生像往常一样准备出海，但港口的气氛却异常沉重。几个月前，日本政府宣布了福岛第一核电站处理水排海计划，这一决定在全球范围内引发了巨大争议。

福岛核事故已经过去12年，但它的影响远未结束。东京电力公司表示，经过处理的核污染水中氚等放射性物质浓度符合国际标准，但很多科学家和环保组织对此持谨慎态度。根据国际原子能机构的报告，虽然排放计划符合安全标准，但仍存在一些不确定性，特别是长期环境影响方面。

在福岛，当地渔民的担忧最为直接。他们的生计依赖于海洋资源，而排海计划可能导致消费者对海产品安全的担忧，进而影响整个渔业产业链。与此同时，一些专家认为，科学评估表明排海是目前可行的选择之一，其他处理方式如继续储存或蒸汽释放也各有优缺点。

这场争论不仅涉及科学数据和技术评估，还触及了信任、责任和代际伦理等深层次问题。不同国家、不同群体基于各自的立场和利益，对这一问题有着截然不同的看法。";

const AI_JOBS_STORY: &str = "2022年的一个雨夜，软件工程师李明坐在办公室里，盯着电脑屏幕上的代码陷入沉思。他刚刚看到一条新闻：某科技巨头发布了一款新的AI编程助手，能够自动生成高质量的代码，效率比人类程序员高出数倍。这让他开始担心自己的工作是否在不久的将来会被人工智能取代。

李明的担忧并非个例。随着ChatGPT、DALL-E等生成式AI的迅速发展，越来越多的职业领域感受到了技术变革的压力。根据麦肯锡全球研究院的一份报告，到2030年，全球可能有多达8亿个工作岗位被自动化技术取代。同时，也有研究表明，AI的发展可能创造新的就业机会，推动经济增长。

在工厂车间，自动化生产线已经取代了部分重复性劳动；在医院，AI辅助诊断系统正在帮助医生提高诊断准确率；在金融行业，智能算法正在改变传统的风险管理模式。这些变化既带来了效率提升，也引发了关于就业结构变化、收入不平等和教育体系改革的讨论。

这场关于AI与就业的争论，本质上是关于人类未来工作形态的思考。我们应该如何看待技术进步带来的挑战和机遇？个人、企业和政府应该如何应对这些变化？";

/// Scenario story introducing the controversy.
pub fn background_story(topic: &Topic) -> String {
    match topic.id.as_str() {
        "1" => DISCHARGE_STORY.to_string(),
        "2" => AI_JOBS_STORY.to_string(),
        _ => {
            let field = topic.tags.first().map(String::as_str).unwrap_or("相关");
            format!(
                "随着{field}领域的快速发展，{title}这一问题日益成为公众关注的焦点。不同立场的人们基于各自的知识背景、价值观念和利益诉求，对这一问题有着不同的看法。

最近的一项调查显示，超过60%的受访者认为这一争议需要更多的科学研究和公众讨论。与此同时，一些关键事件的发生也推动了相关政策的制定和调整。

在这场复杂的争议中，各种声音交织在一起，形成了一幅多元的社会图景。理解这些不同的声音，分析它们背后的逻辑和证据，是我们参与这场讨论的基础。",
                title = topic.title
            )
        }
    }
}

/// Four reading prompts for a topic.
pub fn guiding_questions(topic_id: &str) -> Vec<String> {
    let questions: [&str; 4] = match topic_id {
        "1" => [
            "报道中提到了哪些科学数据和研究？这些证据的来源是什么？可信度如何？",
            "关于核污染水排海的长期环境影响，存在哪些不确定性？",
            "不同利益相关者（渔民、科学家、政府官员、普通民众）可能关注哪些不同的方面？",
            "国际社会对这一问题的看法有哪些主要分歧？这些分歧背后的原因是什么？",
        ],
        "2" => [
            "文章中引用了哪些关于AI影响就业的研究数据？这些数据的时效性和可靠性如何？",
            "AI技术在不同行业的影响程度有什么差异？为什么会有这些差异？",
            "你认为哪些工作最容易被AI取代？哪些工作相对安全？为什么？",
            "面对AI技术的发展，个人和社会应该如何做准备？",
        ],
        _ => [
            "这篇背景介绍中提供了哪些关键事实和数据？它们的来源是什么？",
            "围绕这个议题，存在哪些主要的不确定性和争议点？",
            "不同立场的人可能会如何解读这些信息？为什么？",
            "这个议题对社会、经济或环境可能产生哪些长期影响？",
        ],
    };
    questions.iter().map(|q| q.to_string()).collect()
}
