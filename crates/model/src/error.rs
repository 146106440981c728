//! Error types for entity construction and decoding.

/// Errors produced while building or decoding entities.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("malformed data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("game id must not be empty")]
    EmptyId,

    #[error("unknown game type: {0:?}")]
    UnknownKind(String),
}
