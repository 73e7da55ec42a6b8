//! Error types for Blogsmith.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Generation error: {0}")]
    Llm(#[from] LlmError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Document-store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read store: {0}")]
    Read(String),

    #[error("Failed to write store: {0}")]
    Write(String),

    #[error("Store data is corrupt: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// LLM content-generation errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Anthropic API key not configured")]
    MissingApiKey,

    #[error("Generation request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response from model: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CMS publish error: a human-readable message plus the ordered debug trace
/// accumulated while building and sending the request.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct PublishError {
    pub message: String,
    pub debug: Vec<String>,
}

impl PublishError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            debug: Vec::new(),
        }
    }

    pub fn with_debug(message: impl Into<String>, debug: Vec<String>) -> Self {
        Self {
            message: message.into(),
            debug,
        }
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
