//! Errors raised by repository collaborators.

use thiserror::Error;

/// Failure of a read-only repository lookup.
///
/// The resolution engine never retries; these propagate to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("invalid repository data: {0}")]
    InvalidData(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;
