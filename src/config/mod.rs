use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub learning: LearningConfig,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Timing knobs for the simulated front-end behaviour
#[derive(Debug, Clone)]
pub struct LearningConfig {
    /// Delay standing in for the mock topic-generation API call.
    pub simulated_latency_ms: u64,
    /// How long the learner sees the unknown-topic notice before redirect.
    pub redirect_delay_ms: u64,
    /// Delay before the scripted dialogue partner answers.
    pub dialogue_reply_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database = DatabaseConfig {
            path: PathBuf::from(
                env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/controvlearn.db".to_string()),
            ),
            max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5),
        };

        if database.max_connections == 0 {
            return Err(AppError::Config {
                message: "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            });
        }

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let defaults = LearningConfig::default();
        let learning = LearningConfig {
            simulated_latency_ms: parse_env("SIMULATED_LATENCY_MS", defaults.simulated_latency_ms),
            redirect_delay_ms: parse_env("REDIRECT_DELAY_MS", defaults.redirect_delay_ms),
            dialogue_reply_delay_ms: parse_env(
                "DIALOGUE_REPLY_DELAY_MS",
                defaults.dialogue_reply_delay_ms,
            ),
        };

        Ok(Config {
            database,
            logging,
            learning,
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 1500,
            redirect_delay_ms: 2000,
            dialogue_reply_delay_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
