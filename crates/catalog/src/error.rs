//! Error types for catalog queries.

use std::fmt;

/// Errors raised inside a catalog query.
///
/// These never leave the crate's public query methods; they are converted
/// into a [`CatalogFailure`] at the outermost call.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("anti-bot challenge from {url}")]
    Challenge { url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Coarse failure category returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Could not connect or the connection dropped.
    Connection,
    /// The request timed out.
    Timeout,
    /// Cloudflare page, CAPTCHA or similar interception.
    Challenge,
    /// Non-success HTTP status.
    Status,
    /// The response could not be decoded.
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Connection => write!(f, "connection"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Challenge => write!(f, "challenge"),
            FailureKind::Status => write!(f, "status"),
            FailureKind::Decode => write!(f, "decode"),
        }
    }
}

/// A failed catalog query, returned as a value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} failure: {detail}")]
pub struct CatalogFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl CatalogError {
    /// Classifies the error.
    pub fn kind(&self) -> FailureKind {
        match self {
            CatalogError::Http(e) if e.is_timeout() => FailureKind::Timeout,
            CatalogError::Http(e) if e.is_decode() || e.is_body() => FailureKind::Decode,
            CatalogError::Http(e) if e.is_status() => FailureKind::Status,
            CatalogError::Http(_) => FailureKind::Connection,
            CatalogError::Status { .. } => FailureKind::Status,
            CatalogError::Challenge { .. } => FailureKind::Challenge,
            CatalogError::Json(_) | CatalogError::Parse(_) => FailureKind::Decode,
        }
    }
}

impl From<CatalogError> for CatalogFailure {
    fn from(err: CatalogError) -> Self {
        Self {
            kind: err.kind(),
            detail: err.to_string(),
        }
    }
}
