//! Configuration types.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default Anthropic model for content generation.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Batch-processing configuration.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of concurrent generation workers per job.
    pub worker_count: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { worker_count: 3 }
    }
}

/// Application configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen port.
    pub port: u16,
    /// Path of the JSON document store.
    pub store_path: PathBuf,
    /// Anthropic API key.
    pub anthropic_api_key: SecretString,
    /// Anthropic model name.
    pub model: String,
    /// Batch-processing settings.
    pub batch: BatchConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("ANTHROPIC_API_KEY".to_string()))?;

        let port = match std::env::var("BLOGSMITH_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BLOGSMITH_PORT".to_string(),
                message: format!("not a valid port number: {raw}"),
            })?,
            Err(_) => 3000,
        };

        let store_path = std::env::var("BLOGSMITH_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/db.json"));

        let model =
            std::env::var("BLOGSMITH_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            port,
            store_path,
            anthropic_api_key: api_key.into(),
            model,
            batch: BatchConfig::default(),
        })
    }
}
