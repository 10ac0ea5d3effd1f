//! Perspective puzzle.
//!
//! Learners place stakeholder roles on a five-slot spectrum from "more
//! worried about risk" to "more confident it is controllable", and tag
//! each role with what it cares about and whom it trusts.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::TopicCatalog;
use crate::content::{find_tag, perspective_roles, PerspectiveRole, TagCategory};
use crate::error::{AppResult, LearningError};
use crate::storage::{load_json_or_default, save_json, topic_key, SharedStore, TopicDataKind};

/// Slot on the risk spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    Left,
    LeftCenter,
    Center,
    RightCenter,
    Right,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::Left,
        Position::LeftCenter,
        Position::Center,
        Position::RightCenter,
        Position::Right,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Position::Left => "更担忧风险",
            Position::LeftCenter => "偏担忧",
            Position::Center => "复杂 / 说不清",
            Position::RightCenter => "偏乐观",
            Position::Right => "更相信可控",
        }
    }
}

/// Tag names attached to a role, by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTags {
    #[serde(default)]
    pub concern: Vec<String>,
    #[serde(default)]
    pub source: Vec<String>,
}

impl RoleTags {
    fn category_mut(&mut self, category: TagCategory) -> &mut Vec<String> {
        match category {
            TagCategory::Concern => &mut self.concern,
            TagCategory::Source => &mut self.source,
        }
    }
}

/// Where one role sits and how it is tagged. `None` means unplaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePlacement {
    pub position: Option<Position>,
    #[serde(default)]
    pub tags: RoleTags,
}

/// Role id to placement, as stored.
pub type PerspectiveMap = BTreeMap<String, RolePlacement>;

/// Put a role in a slot, keeping its tags.
pub fn place(map: &mut PerspectiveMap, role_id: &str, position: Position) {
    map.entry(role_id.to_string()).or_default().position = Some(position);
}

/// Return a role to the pool. Its tags are kept.
pub fn unplace(map: &mut PerspectiveMap, role_id: &str) {
    map.entry(role_id.to_string()).or_default().position = None;
}

/// Add the tag name if absent, remove it if present. Returns whether it is now set.
pub fn toggle_tag(
    map: &mut PerspectiveMap,
    role_id: &str,
    category: TagCategory,
    tag_name: &str,
) -> bool {
    let names = map
        .entry(role_id.to_string())
        .or_default()
        .tags
        .category_mut(category);
    match names.iter().position(|n| n == tag_name) {
        Some(index) => {
            names.remove(index);
            false
        }
        None => {
            names.push(tag_name.to_string());
            true
        }
    }
}

/// Roles not currently placed, in catalogue order.
pub fn pool(map: &PerspectiveMap, roles: &[PerspectiveRole]) -> Vec<PerspectiveRole> {
    roles
        .iter()
        .filter(|r| map.get(&r.id).and_then(|p| p.position).is_none())
        .cloned()
        .collect()
}

/// One slot with the roles placed in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub id: Position,
    pub label: &'static str,
    pub roles: Vec<PerspectiveRole>,
}

/// The whole puzzle as a front end renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerspectiveBoard {
    pub topic_id: String,
    pub map: PerspectiveMap,
    pub slots: Vec<SlotView>,
    pub pool: Vec<PerspectiveRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl PerspectiveBoard {
    fn build(topic_id: &str, map: PerspectiveMap, notice: Option<String>) -> Self {
        let roles = perspective_roles(topic_id);
        let slots = Position::ALL
            .iter()
            .map(|&position| SlotView {
                id: position,
                label: position.label(),
                roles: roles
                    .iter()
                    .filter(|r| map.get(&r.id).and_then(|p| p.position) == Some(position))
                    .cloned()
                    .collect(),
            })
            .collect();
        Self {
            topic_id: topic_id.to_string(),
            pool: pool(&map, &roles),
            slots,
            map,
            notice,
        }
    }
}

/// Persists the perspective map of each topic.
#[derive(Clone)]
pub struct PerspectiveService {
    store: SharedStore,
    catalog: Arc<dyn TopicCatalog>,
}

impl PerspectiveService {
    pub fn new(store: SharedStore, catalog: Arc<dyn TopicCatalog>) -> Self {
        Self { store, catalog }
    }

    async fn load(&self, topic_id: &str) -> AppResult<PerspectiveMap> {
        Ok(load_json_or_default(
            self.store.as_ref(),
            &topic_key(topic_id, TopicDataKind::PerspectiveMap),
        )
        .await?)
    }

    async fn save(&self, topic_id: &str, map: &PerspectiveMap) -> AppResult<()> {
        save_json(
            self.store.as_ref(),
            &topic_key(topic_id, TopicDataKind::PerspectiveMap),
            map,
        )
        .await?;
        Ok(())
    }

    async fn role(&self, topic_id: &str, role_id: &str) -> AppResult<PerspectiveRole> {
        self.catalog.require(topic_id).await?;
        perspective_roles(topic_id)
            .into_iter()
            .find(|r| r.id == role_id)
            .ok_or_else(|| {
                LearningError::RoleNotFound {
                    role_id: role_id.to_string(),
                }
                .into()
            })
    }

    pub async fn get(&self, topic_id: &str) -> AppResult<PerspectiveBoard> {
        self.catalog.require(topic_id).await?;
        let map = self.load(topic_id).await?;
        Ok(PerspectiveBoard::build(topic_id, map, None))
    }

    pub async fn place(
        &self,
        topic_id: &str,
        role_id: &str,
        position: Position,
    ) -> AppResult<PerspectiveBoard> {
        let role = self.role(topic_id, role_id).await?;
        let mut map = self.load(topic_id).await?;
        place(&mut map, role_id, position);
        self.save(topic_id, &map).await?;

        debug!(topic_id = %topic_id, role_id = %role_id, ?position, "Placed role");
        let notice = format!("{} 已放置到 {}", role.name, position.label());
        Ok(PerspectiveBoard::build(topic_id, map, Some(notice)))
    }

    pub async fn unplace(&self, topic_id: &str, role_id: &str) -> AppResult<PerspectiveBoard> {
        let role = self.role(topic_id, role_id).await?;
        let mut map = self.load(topic_id).await?;
        unplace(&mut map, role_id);
        self.save(topic_id, &map).await?;

        debug!(topic_id = %topic_id, role_id = %role_id, "Returned role to pool");
        let notice = format!("{} 已移回待放置区域", role.name);
        Ok(PerspectiveBoard::build(topic_id, map, Some(notice)))
    }

    pub async fn toggle_tag(
        &self,
        topic_id: &str,
        role_id: &str,
        tag_id: &str,
    ) -> AppResult<PerspectiveBoard> {
        self.role(topic_id, role_id).await?;
        let tag = find_tag(tag_id).ok_or_else(|| LearningError::TagNotFound {
            tag_id: tag_id.to_string(),
        })?;

        let mut map = self.load(topic_id).await?;
        let set = toggle_tag(&mut map, role_id, tag.category, tag.name);
        self.save(topic_id, &map).await?;

        debug!(topic_id = %topic_id, role_id = %role_id, tag_id = %tag_id, set, "Toggled role tag");
        Ok(PerspectiveBoard::build(topic_id, map, None))
    }

    /// Clear every placement and tag of a topic.
    pub async fn reset(&self, topic_id: &str) -> AppResult<PerspectiveBoard> {
        self.catalog.require(topic_id).await?;
        let map = PerspectiveMap::new();
        self.save(topic_id, &map).await?;
        Ok(PerspectiveBoard::build(topic_id, map, None))
    }
}
