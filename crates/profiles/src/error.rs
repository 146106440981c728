//! Error types for the profile store.

/// Errors produced by [`ProfileManager`](crate::ProfileManager) operations.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid profile document: {0}")]
    Decode(String),

    #[error("profile not found: {0}")]
    NotFound(String),

    #[error("invalid profile name: {0:?}")]
    InvalidName(String),
}
