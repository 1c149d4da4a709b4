//! Link store backends.
//!
//! [`RedisLinkStore`] runs every operation through a bounded
//! [`lil_pool::RedisPool`]; [`InMemoryLinkStore`] keeps everything in a
//! sharded map and is meant for tests and single-node setups.

pub mod error;
pub mod memory;
pub mod redis;

pub use error::map_pool_error;
pub use lil_core::{LinkStore, ReadLinkStore, StoreError};
pub use memory::InMemoryLinkStore;
pub use redis::{RedisLinkStore, RedisStoreSettings};

/// Default cap on the page size of a search.
pub const DEFAULT_MAX_SEARCH_LIMIT: usize = 100;
