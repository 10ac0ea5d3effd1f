//! Static learning material.
//!
//! Everything here is fixed per topic: the viewpoint passages learners
//! annotate, the stakeholder roles for the perspective puzzle, and the
//! background reading. Topics without bespoke material (including generated
//! ones) get a generic set.

mod reading;
mod roles;
mod viewpoints;

pub use reading::{background_story, guiding_questions};
pub use roles::{find_tag, perspective_roles, ROLE_TAGS};
pub use viewpoints::{find_sentence, viewpoints};

use serde::{Deserialize, Serialize};

use crate::catalog::Topic;
use crate::progress::{LearningStep, StepInfo};

/// Which side a viewpoint passage argues for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewpointPosition {
    Support,
    Oppose,
    Conditional,
}

impl ViewpointPosition {
    /// Heading prefix shown above the passage.
    pub fn label(self) -> &'static str {
        match self {
            ViewpointPosition::Support => "支持方",
            ViewpointPosition::Oppose => "反对方",
            ViewpointPosition::Conditional => "条件支持",
        }
    }
}

/// One annotatable sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    pub id: String,
    pub text: String,
    pub viewpoint_id: String,
}

/// A passage written from one stance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewpoint {
    pub id: String,
    pub title: String,
    pub description: String,
    pub position: ViewpointPosition,
    pub sentences: Vec<Sentence>,
}

/// A stakeholder placed on the perspective spectrum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerspectiveRole {
    pub id: String,
    pub name: String,
    pub concern: String,
    pub description: String,
}

/// Tag category on a perspective role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCategory {
    Concern,
    Source,
}

/// A predefined perspective tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleTag {
    pub id: &'static str,
    pub name: &'static str,
    pub category: TagCategory,
}

/// All material a front end needs to render a topic.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMaterial {
    pub topic: Topic,
    pub background: String,
    pub guiding_questions: Vec<String>,
    pub viewpoints: Vec<Viewpoint>,
    pub roles: Vec<PerspectiveRole>,
    pub role_tags: Vec<RoleTag>,
    pub steps: Vec<StepInfo>,
}

impl TopicMaterial {
    /// Assemble the material for one topic.
    pub fn for_topic(topic: Topic) -> Self {
        Self {
            background: background_story(&topic),
            guiding_questions: guiding_questions(&topic.id),
            viewpoints: viewpoints(&topic.id),
            roles: perspective_roles(&topic.id),
            role_tags: ROLE_TAGS.to_vec(),
            steps: LearningStep::ALL.iter().map(|s| s.info(&topic.id)).collect(),
            topic,
        }
    }
}
