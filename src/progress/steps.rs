//! The eight learning steps and the route surface.

use serde::{Deserialize, Serialize};

/// One step of the learning workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LearningStep {
    TopicIntroduction,
    BackgroundReading,
    InitialIntuition,
    PerspectivePuzzle,
    ArgumentAnalysis,
    DialogueSimulation,
    MetaCognition,
    PositionReview,
}

impl LearningStep {
    /// All steps in workflow order.
    pub const ALL: [LearningStep; 8] = [
        LearningStep::TopicIntroduction,
        LearningStep::BackgroundReading,
        LearningStep::InitialIntuition,
        LearningStep::PerspectivePuzzle,
        LearningStep::ArgumentAnalysis,
        LearningStep::DialogueSimulation,
        LearningStep::MetaCognition,
        LearningStep::PositionReview,
    ];

    /// 1-based step number.
    pub fn number(self) -> u8 {
        match self {
            LearningStep::TopicIntroduction => 1,
            LearningStep::BackgroundReading => 2,
            LearningStep::InitialIntuition => 3,
            LearningStep::PerspectivePuzzle => 4,
            LearningStep::ArgumentAnalysis => 5,
            LearningStep::DialogueSimulation => 6,
            LearningStep::MetaCognition => 7,
            LearningStep::PositionReview => 8,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    /// The step that must be completed first, if any.
    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            LearningStep::TopicIntroduction => "议题介绍",
            LearningStep::BackgroundReading => "背景阅读",
            LearningStep::InitialIntuition => "初始直觉记录",
            LearningStep::PerspectivePuzzle => "视角拼图",
            LearningStep::ArgumentAnalysis => "论证解剖",
            LearningStep::DialogueSimulation => "对话模拟",
            LearningStep::MetaCognition => "元认知反思",
            LearningStep::PositionReview => "立场回顾与变化轨迹",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            LearningStep::TopicIntroduction => "理解争议的核心问题和背景",
            LearningStep::BackgroundReading => "了解相关事实、数据和研究",
            LearningStep::InitialIntuition => "记录你对争议的第一反应和想法",
            LearningStep::PerspectivePuzzle => "从多角度理解不同立场的观点",
            LearningStep::ArgumentAnalysis => "深入分析论证结构和证据质量",
            LearningStep::DialogueSimulation => "模拟不同立场之间的对话",
            LearningStep::MetaCognition => "反思自己的思考过程和认知偏差",
            LearningStep::PositionReview => "回顾立场变化并总结学习收获",
        }
    }

    /// Path segment after `/topic/:id`; step 1 has none.
    pub fn route_segment(self) -> Option<&'static str> {
        match self {
            LearningStep::TopicIntroduction => None,
            LearningStep::BackgroundReading => Some("background-reading"),
            LearningStep::InitialIntuition => Some("initial-intuition"),
            LearningStep::PerspectivePuzzle => Some("perspective-puzzle"),
            LearningStep::ArgumentAnalysis => Some("argument-analysis"),
            LearningStep::DialogueSimulation => Some("dialogue-simulation"),
            LearningStep::MetaCognition => Some("meta-cognition"),
            LearningStep::PositionReview => Some("position-review"),
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.route_segment() == Some(segment))
    }

    pub fn route_path(self, topic_id: &str) -> String {
        match self.route_segment() {
            Some(segment) => format!("/topic/{}/{}", topic_id, segment),
            None => format!("/topic/{}", topic_id),
        }
    }

    /// Serializable summary of the step for one topic.
    pub fn info(self, topic_id: &str) -> StepInfo {
        StepInfo {
            id: self.number(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            route_path: self.route_path(topic_id),
        }
    }
}

/// Route for a step number; unknown steps resolve to the home page.
pub fn step_route(topic_id: &str, step: u8) -> String {
    LearningStep::from_number(step)
        .map(|s| s.route_path(topic_id))
        .unwrap_or_else(|| "/".to_string())
}

/// A step as shown in the workflow sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInfo {
    pub id: u8,
    pub name: String,
    pub description: String,
    pub route_path: String,
}

/// A parsed application path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Topics,
    MyLearning,
    Help,
    Profile,
    TopicStep { topic_id: String, step: LearningStep },
    NotFound,
}

impl Route {
    /// Parse a path such as `/topic/1/argument-analysis`.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["topics"] => Route::Topics,
            ["my-learning"] => Route::MyLearning,
            ["help"] => Route::Help,
            ["profile"] => Route::Profile,
            ["topic", id] => Route::TopicStep {
                topic_id: id.to_string(),
                step: LearningStep::TopicIntroduction,
            },
            ["topic", id, segment] => match LearningStep::from_segment(segment) {
                Some(step) => Route::TopicStep {
                    topic_id: id.to_string(),
                    step,
                },
                None => Route::NotFound,
            },
            _ => Route::NotFound,
        }
    }

    /// Canonical path for the route.
    pub fn path(&self) -> String {
        match self {
            Route::Home | Route::NotFound => "/".to_string(),
            Route::Topics => "/topics".to_string(),
            Route::MyLearning => "/my-learning".to_string(),
            Route::Help => "/help".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::TopicStep { topic_id, step } => step.route_path(topic_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbers_round_trip() {
        for step in LearningStep::ALL {
            assert_eq!(LearningStep::from_number(step.number()), Some(step));
        }
        assert_eq!(LearningStep::from_number(0), None);
        assert_eq!(LearningStep::from_number(9), None);
    }

    #[test]
    fn test_previous_step() {
        assert_eq!(LearningStep::TopicIntroduction.previous(), None);
        assert_eq!(
            LearningStep::ArgumentAnalysis.previous(),
            Some(LearningStep::PerspectivePuzzle)
        );
    }

    #[test]
    fn test_step_route() {
        assert_eq!(step_route("1", 1), "/topic/1");
        assert_eq!(step_route("1", 5), "/topic/1/argument-analysis");
        assert_eq!(step_route("x", 8), "/topic/x/position-review");
        assert_eq!(step_route("1", 0), "/");
        assert_eq!(step_route("1", 9), "/");
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/topics"), Route::Topics);
        assert_eq!(Route::parse("/my-learning/"), Route::MyLearning);
        assert_eq!(
            Route::parse("/topic/2"),
            Route::TopicStep {
                topic_id: "2".to_string(),
                step: LearningStep::TopicIntroduction
            }
        );
        assert_eq!(
            Route::parse("/topic/2/meta-cognition?from=home"),
            Route::TopicStep {
                topic_id: "2".to_string(),
                step: LearningStep::MetaCognition
            }
        );
        assert_eq!(Route::parse("/topic/2/unknown"), Route::NotFound);
        assert_eq!(Route::parse("/nowhere"), Route::NotFound);
    }

    #[test]
    fn test_route_path_is_canonical() {
        for step in LearningStep::ALL {
            let path = step.route_path("6");
            assert_eq!(Route::parse(&path).path(), path);
        }
    }
}
