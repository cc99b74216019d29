//! Cache manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use gwadmin_core::config::cache::CacheConfig;
use gwadmin_core::error::AppError;
use gwadmin_core::result::AppResult;
use gwadmin_core::traits::cache::CacheProvider;

/// Cache manager that wraps the configured cache provider.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn CacheProvider>,
    default_ttl: Duration,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn CacheProvider> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis cache provider");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisCacheProvider::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory cache provider");
                Arc::new(crate::memory::MemoryCacheProvider::new(&config.memory))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self {
            inner,
            default_ttl: Duration::from_secs(config.default_ttl_seconds),
        })
    }

    /// Wrap an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn CacheProvider>, default_ttl: Duration) -> Self {
        Self {
            inner: provider,
            default_ttl,
        }
    }

    /// TTL applied to memoised lookups.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Set a value with the default TTL.
    pub async fn set_default(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set(key, value, Some(self.default_ttl)).await
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn keys_matching(&self, pattern: &str) -> AppResult<Vec<String>> {
        self.inner.keys_matching(pattern).await
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        self.inner.delete_pattern(pattern).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
