//! Cache layer of the cache-aside services.
//!
//! [`CacheInterface`] is the raw key/value contract, implemented over Redis
//! by [`RedisCacheService`]. Keys and TTLs are owned by the [`keyspace`]
//! constants so that readers and invalidators of an entity agree on them.

mod cache_interface;
pub mod keyspace;
mod redis_cache;

#[cfg(any(test, feature = "testing"))]
mod memory_cache;

pub use cache_interface::CacheInterface;
pub use keyspace::{Keyspace, CATALOG_TTL, TRANSACTIONAL_TTL};
pub use redis_cache::{RedisCacheService, RedisCacheServiceParameters};

#[cfg(any(test, feature = "testing"))]
pub use memory_cache::{InMemoryCache, UnavailableCache};
