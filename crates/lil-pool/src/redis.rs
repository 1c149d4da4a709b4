use crate::error::{PoolError, Result};
use crate::pool::StorePool;
use crate::settings::StorePoolSettings;
use tracing::info;
use url::Url;

pub use deadpool_redis::redis;
pub use deadpool_redis::Manager as RedisManager;

/// A [`StorePool`] of Redis connections.
pub type RedisPool = StorePool<RedisManager>;

impl StorePool<RedisManager> {
    /// Creates a Redis pool for `address`.
    ///
    /// `address` is either a bare `host:port` or a full `redis://` /
    /// `rediss://` URL. A non-empty `password` replaces any password in the
    /// address.
    pub fn redis(
        address: &str,
        password: Option<&str>,
        settings: StorePoolSettings,
    ) -> Result<Self> {
        let url = redis_url(address, password)?;
        let manager =
            RedisManager::new(url.as_str()).map_err(|e| PoolError::Build(e.to_string()))?;

        info!(
            host = url.host_str().unwrap_or_default(),
            max_active = settings.max_active,
            max_idle = settings.max_idle,
            timeout = ?settings.timeout,
            "Creating Redis connection pool"
        );

        Self::new(manager, settings)
    }
}

fn redis_url(address: &str, password: Option<&str>) -> Result<Url> {
    let raw = if address.contains("://") {
        address.to_string()
    } else {
        format!("redis://{address}")
    };

    let mut url =
        Url::parse(&raw).map_err(|e| PoolError::Build(format!("invalid address '{address}': {e}")))?;

    if url.scheme() != "redis" && url.scheme() != "rediss" {
        return Err(PoolError::Build(format!(
            "unsupported scheme '{}' in address '{address}'",
            url.scheme()
        )));
    }

    if let Some(password) = password.filter(|p| !p.is_empty()) {
        url.set_password(Some(password))
            .map_err(|_| PoolError::Build(format!("cannot set password on '{address}'")))?;
    }

    Ok(url)
}
