//! Stakeholder roles and tags for the perspective puzzle.

use super::{PerspectiveRole, RoleTag, TagCategory};

type RoleDef = (&'static str, &'static str, &'static str, &'static str);

const DISCHARGE_ROLES: &[RoleDef] = &[
    ("role1", "当地渔民", "担心海产品销量与家人健康", "居住在福岛附近海域的传统渔民，世代以捕鱼为生，担心核污染水排海会影响渔业资源和销售"),
    ("role2", "福岛附近餐馆老板", "担心顾客流失和生计问题", "经营海鲜餐厅的老板，依赖新鲜海产品和良好的声誉吸引顾客，担心排海计划影响生意"),
    ("role3", "核电站运营公司代表", "强调处理水安全性和技术可行性", "东京电力公司的技术专家，负责福岛核电站的善后工作，强调经过处理的核污染水符合国际安全标准"),
    ("role4", "日本政府官员", "平衡安全、经济和国际影响", "负责环境政策的政府官员，需要在科学依据、经济成本和国际形象之间寻找平衡"),
    ("role5", "国际原子能机构科学家", "基于科学数据评估风险", "IAEA的核专家，通过独立评估分析排海计划的科学合理性和潜在环境影响"),
    ("role6", "环保组织成员", "担忧长期环境影响和风险", "国际环保组织的活动人士，关注核污染水排海可能带来的长期生态风险和潜在的健康影响"),
    ("role7", "普通城市消费者", "担心食品安全和健康风险", "居住在东京等城市的普通市民，关心日常消费的海产品安全性和潜在健康风险"),
];

const AI_JOBS_ROLES: &[RoleDef] = &[
    ("role1", "软件工程师", "担心职业被AI工具替代", "从事软件开发工作的专业人士，关注AI编程工具对自身职业的影响"),
    ("role2", "企业CEO", "关注生产效率和成本节约", "科技公司的领导者，看到AI技术提升效率和降低成本的潜力"),
    ("role3", "经济学家", "分析长期就业结构变化", "研究技术变革对经济影响的学者，关注AI对就业市场的长期结构性影响"),
    ("role4", "教育工作者", "思考未来教育方向调整", "大学教授，思考如何调整教育体系以适应AI时代的技能需求变化"),
    ("role5", "工厂工人", "面临自动化替代风险", "制造业一线工人，直接感受到自动化和AI技术对传统工作的威胁"),
    ("role6", "AI伦理研究员", "关注社会公平和就业权益", "研究AI伦理问题的专家，关注技术变革中的社会公平和就业权益保障"),
    ("role7", "自由职业者", "探索与AI协作的新可能", "从事创意工作的自由职业者，尝试将AI作为工具提升自身工作效率和创造力"),
];

const GENERIC_ROLES: &[RoleDef] = &[
    ("role1", "行业专家", "基于专业知识评估利弊", "在该领域有深入研究和实践经验的专业人士，能够从专业角度分析议题的利弊"),
    ("role2", "政策制定者", "平衡多方利益和社会影响", "负责制定相关政策的政府官员，需要考虑政策的社会影响和多方利益平衡"),
    ("role3", "普通民众", "关注日常生活的实际影响", "受议题直接或间接影响的普通市民，关心议题对自己日常生活的实际影响"),
    ("role4", "相关企业代表", "关注商业利益和发展机遇", "与议题相关的企业代表，关注议题可能带来的商业机会和挑战"),
    ("role5", "环保人士", "关注环境可持续性", "环保组织成员或关注环境问题的公民，关心议题对环境的影响"),
    ("role6", "学者", "关注长期影响和深层问题", "研究相关领域的学者，关注议题的长期影响和深层社会、经济或科学问题"),
    ("role7", "媒体工作者", "传播信息和公众讨论", "报道相关议题的记者或编辑，负责向公众传播信息并促进讨论"),
];

/// The eight predefined tags, concern tags first.
pub const ROLE_TAGS: [RoleTag; 8] = [
    RoleTag { id: "economic", name: "主要关心经济影响", category: TagCategory::Concern },
    RoleTag { id: "environment", name: "主要关心环境安全", category: TagCategory::Concern },
    RoleTag { id: "health", name: "主要关心健康风险", category: TagCategory::Concern },
    RoleTag { id: "technology", name: "主要关注技术可行性", category: TagCategory::Concern },
    RoleTag { id: "official", name: "更信任官方说法", category: TagCategory::Source },
    RoleTag { id: "scientific", name: "更信任科学研究", category: TagCategory::Source },
    RoleTag { id: "experience", name: "更信任民间经验", category: TagCategory::Source },
    RoleTag { id: "media", name: "主要通过媒体了解", category: TagCategory::Source },
];

/// Stakeholder roles for a topic.
pub fn perspective_roles(topic_id: &str) -> Vec<PerspectiveRole> {
    let defs = match topic_id {
        "1" => DISCHARGE_ROLES,
        "2" => AI_JOBS_ROLES,
        _ => GENERIC_ROLES,
    };
    defs.iter()
        .map(|(id, name, concern, description)| PerspectiveRole {
            id: id.to_string(),
            name: name.to_string(),
            concern: concern.to_string(),
            description: description.to_string(),
        })
        .collect()
}

/// Look up a predefined tag by id.
pub fn find_tag(tag_id: &str) -> Option<&'static RoleTag> {
    ROLE_TAGS.iter().find(|t| t.id == tag_id)
}
