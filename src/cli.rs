//! Command-line interface.
//!
//! `serve` (the default) runs the MCP server on stdio. The other commands
//! inspect or reset the learner's stored data without starting a server.

use clap::{Parser, Subcommand};

use crate::argument::render_text;
use crate::catalog::{Difficulty, TopicCatalog};
use crate::progress::LearningStep;
use crate::reflection::ReviewInput;
use crate::server::AppState;
use crate::storage::clear_topic;

/// ControvLearn learning-workflow server.
#[derive(Parser, Debug)]
#[command(name = "controvlearn", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The command to run; no subcommand means `serve`.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

/// CLI subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the MCP server on stdio
    Serve,

    /// List the topic catalog
    Topics {
        /// Only show topics of this difficulty: beginner or advanced
        #[arg(long)]
        difficulty: Option<String>,
    },

    /// Show completed steps and the last visited page
    Progress,

    /// Print the argument map of a topic as text
    ArgumentMap {
        /// Topic id
        #[arg(long)]
        topic: String,
    },

    /// Print the stance review draft of a topic
    Review {
        /// Topic id
        #[arg(long)]
        topic: String,
    },

    /// Delete every stored artifact of a topic
    Reset {
        /// Topic id
        #[arg(long)]
        topic: String,
    },
}

/// Result of CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    /// Exit code (0 = success)
    pub exit_code: i32,
    /// Output message
    pub message: String,
}

impl CliResult {
    /// Create a success result with the given message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            message: message.into(),
        }
    }

    /// Create an error result with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            message: message.into(),
        }
    }
}

const RULE: &str = "───────────────────────────────────────────────────────────────";

/// Execute a non-server CLI command.
pub async fn execute_command(command: Commands, state: &AppState) -> CliResult {
    match command {
        Commands::Serve => CliResult::error("serve is handled by the binary entry point"),
        Commands::Topics { difficulty } => execute_topics(state, difficulty).await,
        Commands::Progress => execute_progress(state).await,
        Commands::ArgumentMap { topic } => execute_argument_map(state, &topic).await,
        Commands::Review { topic } => execute_review(state, &topic).await,
        Commands::Reset { topic } => execute_reset(state, &topic).await,
    }
}

fn parse_difficulty(value: &str) -> Option<Difficulty> {
    match value.to_lowercase().as_str() {
        "beginner" | "入门" => Some(Difficulty::Beginner),
        "advanced" | "进阶" => Some(Difficulty::Advanced),
        _ => None,
    }
}

async fn execute_topics(state: &AppState, difficulty: Option<String>) -> CliResult {
    let topics = match difficulty.as_deref() {
        Some(raw) => match parse_difficulty(raw) {
            Some(d) => state.topics.by_difficulty(d).await,
            None => {
                return CliResult::error(format!(
                    "Unknown difficulty '{}': use beginner or advanced",
                    raw
                ))
            }
        },
        None => state.topics.list().await,
    };

    let topics = match topics {
        Ok(t) => t,
        Err(e) => return CliResult::error(format!("Failed to load topics: {}", e)),
    };

    let mut output = String::new();
    output.push_str("\nTopics\n");
    output.push_str(RULE);
    output.push('\n');
    for topic in &topics {
        let marker = if topic.is_generated() { " [AI]" } else { "" };
        output.push_str(&format!(
            "{:>18}  {}  {}  {} 分钟{}\n",
            topic.id, topic.difficulty, topic.title, topic.duration, marker
        ));
    }
    output.push_str(&format!("\n{} topic(s)\n", topics.len()));
    CliResult::success(output)
}

async fn execute_progress(state: &AppState) -> CliResult {
    let completed = match state.progress.completed_steps().await {
        Ok(c) => c,
        Err(e) => return CliResult::error(format!("Failed to load progress: {}", e)),
    };

    let mut output = String::new();
    output.push_str("\nLearning Progress\n");
    output.push_str(RULE);
    output.push('\n');
    for step in LearningStep::ALL {
        let mark = if completed.contains(&step.number()) {
            "✓"
        } else {
            " "
        };
        output.push_str(&format!("  [{}] {}. {}\n", mark, step.number(), step.name()));
    }

    match state.progress.last_visited().await {
        Ok(Some(page)) => output.push_str(&format!(
            "\nLast visited: {} (step {}) {}\n",
            page.topic_title, page.step_id, page.route_path
        )),
        Ok(None) => output.push_str("\nLast visited: none\n"),
        Err(e) => output.push_str(&format!("\nLast visited: unknown (error: {})\n", e)),
    }
    CliResult::success(output)
}

async fn execute_argument_map(state: &AppState, topic_id: &str) -> CliResult {
    match state.arguments.argument_map(topic_id, None).await {
        Ok(view) => CliResult::success(render_text(&view.map)),
        Err(e) => CliResult::error(format!("Failed to build argument map: {}", e)),
    }
}

async fn execute_review(state: &AppState, topic_id: &str) -> CliResult {
    let draft = match state
        .reflection
        .review_draft(topic_id, &ReviewInput::default())
        .await
    {
        Ok(d) => d,
        Err(e) => return CliResult::error(format!("Failed to build review: {}", e)),
    };

    let mut output = String::new();
    output.push_str(&format!("\nStance Review: topic {}\n", topic_id));
    output.push_str(RULE);
    output.push('\n');
    output.push_str(&format!(
        "Initial: {} ({})\nFinal:   {} ({})\n\n{}\n\n{}\n",
        draft.initial.value,
        draft.trajectory_summary.label_initial,
        draft.final_stance.value,
        draft.trajectory_summary.label_final,
        draft.trajectory_summary.text,
        draft.summary_text
    ));
    CliResult::success(output)
}

async fn execute_reset(state: &AppState, topic_id: &str) -> CliResult {
    if let Err(e) = state.topics.require(topic_id).await {
        return CliResult::error(e.to_string());
    }
    match clear_topic(state.store.as_ref(), topic_id).await {
        Ok(removed) => CliResult::success(format!(
            "Removed {} stored artifact(s) for topic {}",
            removed.len(),
            topic_id
        )),
        Err(e) => CliResult::error(format!("Failed to reset topic: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Stance;
    use crate::config::{Config, DatabaseConfig, LearningConfig, LoggingConfig};
    use crate::storage::MemoryStorage;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn state() -> AppState {
        let config = Config {
            database: DatabaseConfig {
                path: PathBuf::from(":memory:"),
                max_connections: 1,
            },
            logging: LoggingConfig::default(),
            learning: LearningConfig {
                simulated_latency_ms: 0,
                redirect_delay_ms: 0,
                dialogue_reply_delay_ms: 0,
            },
        };
        AppState::new(config, Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::parse_from(["controvlearn"]);
        assert_eq!(cli.command(), Commands::Serve);
    }

    #[test]
    fn test_parse_topic_commands() {
        let cli = Cli::parse_from(["controvlearn", "argument-map", "--topic", "1"]);
        assert_eq!(
            cli.command(),
            Commands::ArgumentMap {
                topic: "1".to_string()
            }
        );

        let cli = Cli::parse_from(["controvlearn", "reset", "--topic", "2"]);
        assert_eq!(
            cli.command(),
            Commands::Reset {
                topic: "2".to_string()
            }
        );
    }

    #[test]
    fn test_topic_is_required() {
        assert!(Cli::try_parse_from(["controvlearn", "review"]).is_err());
    }

    #[tokio::test]
    async fn test_topics_command() {
        let result = execute_command(Commands::Topics { difficulty: None }, &state()).await;
        assert_eq!(result.exit_code, 0);
        assert!(result.message.contains("6 topic(s)"));

        let result = execute_command(
            Commands::Topics {
                difficulty: Some("expert".to_string()),
            },
            &state(),
        )
        .await;
        assert_eq!(result.exit_code, 1);
    }

    #[tokio::test]
    async fn test_progress_command() {
        let state = state();
        state.progress.enter_step("1", 1).await.unwrap();

        let result = execute_command(Commands::Progress, &state).await;
        assert_eq!(result.exit_code, 0);
        assert!(result.message.contains("[✓] 1."));
        assert!(result.message.contains("/topic/1"));
    }

    #[tokio::test]
    async fn test_reset_command() {
        let state = state();
        state.arguments.add_claim("1", "s1", Stance::Pro).await.unwrap();

        let result = execute_command(
            Commands::Reset {
                topic: "1".to_string(),
            },
            &state,
        )
        .await;
        assert_eq!(result.exit_code, 0);
        assert!(state.arguments.load("1").await.unwrap().claims.is_empty());

        let result = execute_command(
            Commands::Reset {
                topic: "99".to_string(),
            },
            &state,
        )
        .await;
        assert_eq!(result.exit_code, 1);
    }

    #[tokio::test]
    async fn test_review_command_without_records() {
        let result = execute_command(
            Commands::Review {
                topic: "1".to_string(),
            },
            &state(),
        )
        .await;
        assert_eq!(result.exit_code, 0);
        assert!(result.message.contains("Initial: 50 (模棱两可)"));
        assert!(result.message.contains("一个普通学习者"));
    }
}
