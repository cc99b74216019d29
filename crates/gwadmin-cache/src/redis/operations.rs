//! Redis cache provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use gwadmin_core::error::{AppError, ErrorKind};
use gwadmin_core::result::AppResult;
use gwadmin_core::traits::cache::CacheProvider;

use super::client::RedisClient;

/// Keys requested per SCAN round trip.
const SCAN_BATCH: usize = 500;

/// Redis-backed cache provider.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    client: RedisClient,
}

impl RedisCacheProvider {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        let result: Option<String> = conn.get(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        let _: () = match ttl {
            Some(ttl) => conn
                .set_ex(&full_key, value, ttl.as_secs().max(1))
                .await
                .map_err(Self::map_err)?,
            None => conn.set(&full_key, value).await.map_err(Self::map_err)?,
        };
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        let _: () = conn.del(&full_key).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        let result: bool = conn.exists(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn keys_matching(&self, pattern: &str) -> AppResult<Vec<String>> {
        let full_pattern = self.client.prefixed_key(pattern);
        let prefix = self.client.prefixed_key("");
        let mut conn = self.client.conn();
        let mut cursor: u64 = 0;
        let mut found = Vec::new();

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&full_pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(Self::map_err)?;

            found.extend(
                keys.iter()
                    .filter_map(|k| k.strip_prefix(prefix.as_str()))
                    .map(str::to_string),
            );

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(found)
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        let keys: Vec<String> = self
            .keys_matching(pattern)
            .await?
            .iter()
            .map(|k| self.client.prefixed_key(k))
            .collect();
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.client.conn();
        let count: u64 = conn.del(&keys).await.map_err(Self::map_err)?;

        debug!(pattern, count, "Deleted keys matching pattern");
        Ok(count)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
