use thiserror::Error;

/// Common error types used across the application.
#[derive(Debug, Error)]
pub enum ReactorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
