use std::time::Duration;
use thiserror::Error;

/// Type alias for pool results.
pub type Result<T> = std::result::Result<T, PoolError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("timed out establishing a connection: {0}")]
    ConnectTimeout(String),
    #[error("timed out waiting for a free connection: {0}")]
    WaitTimeout(String),
    #[error("operation timed out after {0:?}")]
    OperationTimeout(Duration),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("pool is closed")]
    Closed,
    #[error("invalid pool configuration: {0}")]
    Build(String),
}

impl PoolError {
    /// Returns `true` for errors caused by an expired deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            PoolError::ConnectTimeout(_) | PoolError::WaitTimeout(_) | PoolError::OperationTimeout(_)
        )
    }
}
