use lil_core::StoreError;
use lil_pool::PoolError;

/// Converts a pool failure into the store-level error.
///
/// Timeouts, refused connections and closed pools all become
/// [`StoreError::Unavailable`]; callers never see pool internals.
pub fn map_pool_error(err: PoolError) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn transport_errors_become_unavailable() {
        let errors = [
            PoolError::ConnectTimeout("connect".to_string()),
            PoolError::WaitTimeout("wait".to_string()),
            PoolError::OperationTimeout(Duration::from_secs(1)),
            PoolError::Backend("connection refused".to_string()),
            PoolError::Closed,
        ];

        for err in errors {
            assert!(matches!(map_pool_error(err), StoreError::Unavailable(_)));
        }
    }
}
