//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use emporium_core::EmporiumResult;
use shaku::Interface;
use std::time::Duration;

/// Key/value cache holding JSON text.
///
/// Entries may disappear at any moment through expiry, deletion or
/// eviction, and callers cannot tell which. Errors are reported but a
/// cache-aside caller treats them like a miss.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Returns the stored value, or `None` when absent or expired.
    async fn get_raw(&self, key: &str) -> EmporiumResult<Option<String>>;

    /// Stores a value, overwriting any previous one.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> EmporiumResult<()>;

    /// Removes a key. Returns whether anything was removed.
    async fn delete(&self, key: &str) -> EmporiumResult<bool>;

    /// Removes every key matching a glob pattern and returns how many went.
    async fn delete_pattern(&self, pattern: &str) -> EmporiumResult<u64>;

    /// Whether a backing store is configured at all.
    fn is_enabled(&self) -> bool;
}
