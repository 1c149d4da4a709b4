use crate::error::{PoolError, Result};
use crate::pool::StorePool;
use deadpool::managed::{Manager, Object};
use std::fmt::Display;
use std::future::Future;
use tracing::warn;

/// A connection checked out of a [`StorePool`].
///
/// Dropping it hands the connection back to the pool, also on error paths
/// and when the owning task is cancelled, so a slot is never leaked. A
/// connection whose last operation timed out or was cancelled half-way is
/// closed instead of reused.
pub struct PooledConnection<M: Manager> {
    object: Option<Object<M>>,
    pool: StorePool<M>,
    broken: bool,
}

impl<M: Manager> PooledConnection<M> {
    pub(crate) fn new(object: Object<M>, pool: StorePool<M>) -> Self {
        Self {
            object: Some(object),
            pool,
            broken: false,
        }
    }

    /// Runs one operation on the connection, bounded by the pool timeout.
    ///
    /// Backend errors are returned as [`PoolError::Backend`] and leave the
    /// connection usable. Exceeding the timeout returns
    /// [`PoolError::OperationTimeout`] and marks the connection broken.
    pub async fn bounded<'a, T, E, F, Fut>(&'a mut self, op: F) -> Result<T>
    where
        F: FnOnce(&'a mut M::Type) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>> + 'a,
        E: Display,
    {
        let timeout = self.pool.timeout();
        let Self { object, broken, .. } = self;
        let Some(object) = object.as_mut() else {
            return Err(PoolError::Closed);
        };

        // Stays set if this future is dropped mid-operation.
        *broken = true;
        let outcome = tokio::time::timeout(timeout, op(&mut **object)).await;

        match outcome {
            Ok(Ok(value)) => {
                *broken = false;
                Ok(value)
            }
            Ok(Err(e)) => {
                *broken = false;
                Err(PoolError::Backend(e.to_string()))
            }
            Err(_) => {
                warn!(timeout = ?timeout, "Pooled operation timed out");
                Err(PoolError::OperationTimeout(timeout))
            }
        }
    }

    /// Closes the connection instead of returning it to the idle set.
    pub fn discard(mut self) {
        self.broken = true;
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    #[cfg(test)]
    pub(crate) fn object_ref(&self) -> Option<&M::Type> {
        self.object.as_deref()
    }
}

impl<M: Manager> Drop for PooledConnection<M> {
    fn drop(&mut self) {
        if let Some(object) = self.object.take() {
            self.pool.release(object, self.broken);
        }
    }
}

impl<M: Manager> std::fmt::Debug for PooledConnection<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledConnection")
            .field("broken", &self.broken)
            .finish_non_exhaustive()
    }
}
