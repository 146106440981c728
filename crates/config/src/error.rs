//! Error types for config persistence.

/// Errors produced while reading or writing `config.json`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config document: {0}")]
    Decode(String),
}
