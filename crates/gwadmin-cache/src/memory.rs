//! In-memory cache implementation using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use gwadmin_core::config::cache::MemoryCacheConfig;
use gwadmin_core::result::AppResult;
use gwadmin_core::traits::cache::CacheProvider;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Option<Duration>,
}

/// Expires each entry after its own TTL; `None` never expires.
struct PerEntryExpiry;

impl Expiry<String, Entry> for PerEntryExpiry {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        entry.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.ttl
    }
}

/// In-memory cache provider using moka.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    cache: Cache<String, Entry>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        let entry = Entry {
            value: value.to_string(),
            ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.cache.get(key).await.is_some())
    }

    async fn keys_matching(&self, pattern: &str) -> AppResult<Vec<String>> {
        // Moka has no pattern scan; match the prefix before the wildcard.
        let prefix = pattern.trim_end_matches('*');
        Ok(self
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.to_string())
            .collect())
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        let keys = self.keys_matching(pattern).await?;
        let count = keys.len() as u64;
        for key in keys {
            self.cache.invalidate(&key).await;
        }

        debug!(pattern, count, "Deleted keys matching pattern");
        Ok(count)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_provider() -> MemoryCacheProvider {
        MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 1000 })
    }

    #[tokio::test]
    async fn test_set_get_delete() {
        let provider = make_provider();
        provider.set("key1", "value1", None).await.unwrap();
        assert_eq!(provider.get("key1").await.unwrap().as_deref(), Some("value1"));
        assert!(provider.exists("key1").await.unwrap());

        provider.delete("key1").await.unwrap();
        assert_eq!(provider.get("key1").await.unwrap(), None);
        provider.delete("key1").await.unwrap();
    }

    #[tokio::test]
    async fn test_entry_ttl_expires() {
        let provider = make_provider();
        provider
            .set("short", "v", Some(Duration::from_millis(50)))
            .await
            .unwrap();
        provider.set("forever", "v", None).await.unwrap();

        std::thread::sleep(Duration::from_millis(200));

        assert_eq!(provider.get("short").await.unwrap(), None);
        assert_eq!(provider.get("forever").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_delete_pattern_only_touches_prefix() {
        let provider = make_provider();
        provider.set("session:owner:user:1:aa", "1", None).await.unwrap();
        provider.set("session:owner:user:1:bb", "1", None).await.unwrap();
        provider.set("session:owner:user:12:cc", "1", None).await.unwrap();

        let removed = provider
            .delete_pattern("session:owner:user:1:*")
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(provider.exists("session:owner:user:12:cc").await.unwrap());
    }
}
