use thiserror::Error;

/// Errors raised while constructing core domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid ttl: {0}")]
    InvalidTtl(String),
}

/// Errors returned by [`LinkStore`](crate::LinkStore) implementations.
///
/// Transport failures of any backend (connect or operation timeouts, closed
/// pools, refused connections) all surface as [`StoreError::Unavailable`],
/// so callers never depend on a specific backend's internals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("short code already exists: {0}")]
    Collision(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("invalid search limit: {0}")]
    InvalidLimit(usize),
    #[error("invalid search cursor: {0}")]
    InvalidCursor(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}
