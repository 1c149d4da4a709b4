//! Bounded connection pool for the backing store.
//!
//! [`StorePool`] caps the number of live connections at `max_active` and
//! makes callers queue for a free slot instead of failing when the cap is
//! reached. Every operation runs through [`PooledConnection::bounded`], which
//! applies the pool timeout and throws away any connection whose operation
//! timed out.

pub mod connection;
pub mod error;
pub mod pool;
pub mod redis;
pub mod settings;

pub use connection::PooledConnection;
pub use error::{PoolError, Result};
pub use pool::{PoolStatus, StorePool};
pub use redis::RedisPool;
pub use settings::StorePoolSettings;
