//! Domain error model.

use thiserror::Error;

/// Result type used across the resource layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Resource-level error.
///
/// Every failure of a single request maps to exactly one of these kinds. None
/// of them affect collection state or subsequent requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Required input was missing or malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The addressed identity does not exist in the collection.
    #[error("not found: {0}")]
    NotFound(String),

    /// Unexpected failure caught at the handler boundary.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// The human-readable detail, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(msg) | Self::NotFound(msg) | Self::Internal(msg) => msg,
        }
    }
}
