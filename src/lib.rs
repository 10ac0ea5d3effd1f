//! # ControvLearn
//!
//! Guided learning workflow for socio-scientific controversies. A learner
//! studies one topic in eight steps: introduction, background reading,
//! initial intuition, perspective puzzle, argument analysis, dialogue
//! simulation, metacognitive reflection and stance review.
//!
//! The workflow is exposed as MCP tools over stdio, with every learner
//! artifact persisted as JSON under a fixed key in a key-value store.
//!
//! ## Architecture
//!
//! ```text
//! MCP Client → McpServer (JSON-RPC) → learning services → KeyValueStore
//!                                          ↑                   ↓
//!                                    TopicCatalog        SQLite / memory
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use controvlearn::{AppState, Config, McpServer};
//! use controvlearn::storage::SqliteStorage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let storage = SqliteStorage::new(&config.database).await?;
//!     let state = Arc::new(AppState::new(config, Arc::new(storage)));
//!     McpServer::new(state).run().await?;
//!     Ok(())
//! }
//! ```

/// Claims, evidence, reasoning bridges and the argument map.
pub mod argument;
/// Topic catalog, topic generation and learning statistics.
pub mod catalog;
/// Command-line interface.
pub mod cli;
/// Configuration management.
pub mod config;
/// Static per-topic learning material.
pub mod content;
/// Scripted dialogue simulation.
pub mod dialogue;
/// Error types and result aliases for the application.
pub mod error;
/// Initial intuition and stance labels.
pub mod intuition;
/// Perspective puzzle placements.
pub mod perspective;
/// Step gating, routes and last-visited tracking.
pub mod progress;
/// Metacognitive reflection and stance review.
pub mod reflection;
/// MCP server implementation and request handling.
pub mod server;
/// Key-value persistence layer.
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::{AppState, McpServer, SharedState};
