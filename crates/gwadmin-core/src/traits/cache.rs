//! Cache provider trait for pluggable key-value backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for cache backends (Redis or in-memory).
///
/// All values are serialized as strings (JSON). The cache provider is
/// responsible for key prefixing and TTL enforcement. Every operation is
/// atomic per key; no cross-key transaction is offered.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value. `None` stores the entry without expiry.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()>;

    /// Delete a key from the cache. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists in the cache.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Keys (without provider prefix) matching a trailing-wildcard pattern.
    async fn keys_matching(&self, pattern: &str) -> AppResult<Vec<String>>;

    /// Delete all keys matching a trailing-wildcard pattern (e.g. `"tenant:*"`).
    /// Returns the number of deleted keys.
    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64>;

    /// Check that the cache backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
