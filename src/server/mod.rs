//! Server module for MCP protocol handling.
//!
//! This module provides:
//! - MCP server implementation over stdio
//! - Tool call handlers and routing
//! - Shared application state management

mod handlers;
mod mcp;

pub use handlers::*;
pub use mcp::*;

use std::sync::Arc;

use crate::argument::ArgumentService;
use crate::catalog::{TopicCatalog, TopicService};
use crate::config::Config;
use crate::dialogue::DialogueService;
use crate::intuition::IntuitionService;
use crate::perspective::PerspectiveService;
use crate::progress::ProgressService;
use crate::reflection::ReflectionService;
use crate::storage::SharedStore;

/// Application state shared across handlers.
///
/// Every service reads and writes the same store and resolves topics
/// through the same catalog.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Key-value store backing every service.
    pub store: SharedStore,
    /// Topic catalog, generation and statistics.
    pub topics: Arc<TopicService>,
    /// Step gating and last-visited page.
    pub progress: ProgressService,
    /// Claims, evidence, bridges and the argument map.
    pub arguments: ArgumentService,
    /// Initial intuition records.
    pub intuition: IntuitionService,
    /// Perspective puzzle placements.
    pub perspective: PerspectiveService,
    /// Scripted dialogue sessions.
    pub dialogue: DialogueService,
    /// Reflection, stance review and topic completion.
    pub reflection: ReflectionService,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config, store: SharedStore) -> Self {
        let topics = Arc::new(TopicService::new(store.clone(), config.learning.clone()));
        let catalog: Arc<dyn TopicCatalog> = topics.clone();

        let progress = ProgressService::new(store.clone(), catalog.clone());
        let arguments = ArgumentService::new(store.clone(), catalog.clone());
        let intuition = IntuitionService::new(store.clone(), catalog.clone());
        let perspective = PerspectiveService::new(store.clone(), catalog.clone());
        let dialogue =
            DialogueService::new(store.clone(), catalog.clone(), config.learning.clone());
        let reflection = ReflectionService::new(
            store.clone(),
            catalog,
            arguments.clone(),
            intuition.clone(),
            progress.clone(),
        );

        tracing::info!(
            database = %config.database.path.display(),
            reply_delay_ms = config.learning.dialogue_reply_delay_ms,
            "AppState initialized"
        );

        Self {
            config,
            store,
            topics,
            progress,
            arguments,
            intuition,
            perspective,
            dialogue,
            reflection,
        }
    }

    /// The catalog as the query trait other services see.
    pub fn catalog(&self) -> Arc<dyn TopicCatalog> {
        self.topics.clone()
    }
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;
