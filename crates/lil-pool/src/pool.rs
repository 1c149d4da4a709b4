use crate::connection::PooledConnection;
use crate::error::{PoolError, Result};
use crate::settings::StorePoolSettings;
use deadpool::managed::{Manager, Object, Pool, TimeoutType};
use deadpool::Runtime;
use std::fmt::Display;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Snapshot of the pool counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// Configured `max_active`.
    pub max_size: usize,
    /// Open connections, idle or checked out.
    pub size: usize,
    /// Idle connections ready to be handed out.
    pub available: usize,
    /// Callers queued for a free slot.
    pub waiting: usize,
}

/// A bounded pool of store connections.
///
/// Admission is wait-based: once `max_active` connections are checked out,
/// [`StorePool::acquire`] parks the caller until one is released (or until
/// `wait_timeout` passes, if configured). Cloning is cheap and every clone
/// shares the same slots.
pub struct StorePool<M: Manager> {
    inner: Pool<M>,
    settings: StorePoolSettings,
}

impl<M: Manager> Clone for StorePool<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            settings: self.settings,
        }
    }
}

impl<M: Manager> std::fmt::Debug for StorePool<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorePool")
            .field("settings", &self.settings)
            .field("status", &self.status())
            .finish()
    }
}

impl<M> StorePool<M>
where
    M: Manager + 'static,
    M::Error: Display,
{
    /// Creates a pool that opens connections through `manager`.
    pub fn new(manager: M, settings: StorePoolSettings) -> Result<Self> {
        if settings.max_active == 0 {
            return Err(PoolError::Build("max_active must be at least 1".to_string()));
        }

        let inner = Pool::builder(manager)
            .max_size(settings.max_active)
            .wait_timeout(settings.wait_timeout)
            .create_timeout(Some(settings.timeout))
            .recycle_timeout(Some(settings.timeout))
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| PoolError::Build(e.to_string()))?;

        Ok(Self { inner, settings })
    }

    /// Checks out a connection, opening a new one if no idle one is left.
    ///
    /// Blocks while `max_active` connections are in use. Dropping the
    /// returned future while it waits gives up the place in the queue.
    pub async fn acquire(&self) -> Result<PooledConnection<M>> {
        trace!(status = ?self.status(), "Acquiring pooled connection");

        let object = self.inner.get().await.map_err(|e| {
            let error = map_pool_error(e, self.settings.timeout);
            warn!(error = %error, "Failed to acquire pooled connection");
            error
        })?;

        Ok(PooledConnection::new(object, self.clone()))
    }

    /// Drops idle connections that have not been used for `idle_timeout`.
    ///
    /// Returns the number of connections closed.
    pub fn reap_idle(&self) -> usize {
        let idle_timeout = self.settings.idle_timeout;
        let before = self.status().size;
        self.inner
            .retain(|_, metrics| metrics.last_used() < idle_timeout);
        let reaped = before.saturating_sub(self.status().size);

        if reaped > 0 {
            debug!(reaped, "Reaped idle pooled connections");
        }
        reaped
    }

    /// Runs [`StorePool::reap_idle`] every `interval` until the pool closes.
    pub fn spawn_reaper(&self, interval: Duration) -> JoinHandle<()> {
        let pool = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            while !pool.inner.is_closed() {
                ticker.tick().await;
                pool.reap_idle();
            }
        })
    }
}

impl<M: Manager> StorePool<M> {
    pub fn settings(&self) -> &StorePoolSettings {
        &self.settings
    }

    /// The deadline applied to every operation.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }

    pub fn status(&self) -> PoolStatus {
        let status = self.inner.status();
        PoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available as usize,
            waiting: status.waiting,
        }
    }

    /// Closes the pool. Waiting and future callers get [`PoolError::Closed`].
    pub fn close(&self) {
        self.inner.close();
    }

    /// Hands a connection back.
    ///
    /// Broken connections are closed. Healthy ones go back to the idle set
    /// unless it already holds `max_idle` connections.
    pub(crate) fn release(&self, object: Object<M>, broken: bool) {
        if broken {
            warn!("Discarding pooled connection with unknown protocol state");
            drop(Object::take(object));
            return;
        }

        if self.status().available >= self.settings.max_idle {
            trace!(max_idle = self.settings.max_idle, "Idle set full, closing connection");
            drop(Object::take(object));
            return;
        }

        drop(object);
    }
}

fn map_pool_error<E: Display>(
    err: deadpool::managed::PoolError<E>,
    timeout: Duration,
) -> PoolError {
    use deadpool::managed::PoolError as DeadpoolError;

    let message = err.to_string();
    match err {
        DeadpoolError::Timeout(TimeoutType::Wait) => PoolError::WaitTimeout(message),
        DeadpoolError::Timeout(TimeoutType::Create) => PoolError::ConnectTimeout(message),
        DeadpoolError::Timeout(TimeoutType::Recycle) => PoolError::OperationTimeout(timeout),
        DeadpoolError::Closed => PoolError::Closed,
        _ => PoolError::Backend(message),
    }
}
