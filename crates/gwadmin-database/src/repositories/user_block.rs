//! Brute-force block repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gwadmin_core::error::{AppError, ErrorKind};
use gwadmin_core::result::AppResult;
use gwadmin_entity::UserBlock;

use crate::store::UserBlockStore;

/// Repository for `user_blocks` rows.
#[derive(Debug, Clone)]
pub struct UserBlockRepository {
    pool: PgPool,
}

impl UserBlockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserBlockStore for UserBlockRepository {
    async fn find(&self, email: &str, ip_address: &str) -> AppResult<Option<UserBlock>> {
        sqlx::query_as::<_, UserBlock>(
            "SELECT * FROM user_blocks WHERE email = $1 AND ip_address = $2",
        )
        .bind(email)
        .bind(ip_address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user block", e))
    }

    async fn record_failure(
        &self,
        email: &str,
        ip_address: &str,
        user_id: Option<i64>,
        at: DateTime<Utc>,
    ) -> AppResult<UserBlock> {
        sqlx::query_as::<_, UserBlock>(
            "INSERT INTO user_blocks (user_id, email, ip_address, error_logins_count, time) \
             VALUES ($1, $2, $3, 1, $4) \
             ON CONFLICT (email, ip_address) DO UPDATE SET \
                error_logins_count = user_blocks.error_logins_count + 1, \
                time = EXCLUDED.time, \
                user_id = COALESCE(EXCLUDED.user_id, user_blocks.user_id) \
             RETURNING *",
        )
        .bind(user_id)
        .bind(email)
        .bind(ip_address)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record failed login", e))
    }

    async fn delete(&self, email: &str, ip_address: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_blocks WHERE email = $1 AND ip_address = $2")
            .bind(email)
            .bind(ip_address)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete user block", e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_stale(
        &self,
        email: &str,
        ip_address: &str,
        last_failure: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM user_blocks WHERE email = $1 AND ip_address = $2 AND time <= $3",
        )
        .bind(email)
        .bind(ip_address)
        .bind(last_failure)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete stale user block", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_user(&self, user_id: i64, email: &str) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM user_blocks WHERE user_id = $1 OR LOWER(email) = LOWER($2)")
                .bind(user_id)
                .bind(email)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to purge user blocks", e)
                })?;

        Ok(result.rows_affected())
    }

    async fn locked_times_for_ip(
        &self,
        ip_address: &str,
        threshold: i32,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<DateTime<Utc>>> {
        sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT time FROM user_blocks \
             WHERE ip_address = $1 AND error_logins_count >= $2 AND time > $3 \
             ORDER BY time",
        )
        .bind(ip_address)
        .bind(threshold)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count blocked pairs", e)
        })
    }
}
