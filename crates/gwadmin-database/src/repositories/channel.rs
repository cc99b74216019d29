//! Channel repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use gwadmin_core::error::{AppError, ErrorKind};
use gwadmin_core::result::AppResult;
use gwadmin_entity::Channel;
use gwadmin_entity::channel::CreateChannel;

use super::is_unique_violation;
use crate::store::ChannelStore;

#[derive(Debug, Clone)]
pub struct ChannelRepository {
    pool: PgPool,
}

impl ChannelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelStore for ChannelRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Channel>> {
        sqlx::query_as::<_, Channel>("SELECT * FROM channels WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find channel", e))
    }

    async fn create(&self, data: &CreateChannel) -> AppResult<Channel> {
        sqlx::query_as::<_, Channel>(
            "INSERT INTO channels (login, password, description) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.login)
        .bind(&data.password)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(format!("Channel '{}' already exists", data.login))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create channel", e)
            }
        })
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM channels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete channel", e))?;

        Ok(result.rows_affected() > 0)
    }
}
