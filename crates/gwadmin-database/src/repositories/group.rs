//! Group repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use gwadmin_core::error::{AppError, ErrorKind};
use gwadmin_core::result::AppResult;
use gwadmin_entity::Group;
use gwadmin_entity::group::CreateGroup;

use super::{is_foreign_key_violation, is_unique_violation};
use crate::store::GroupStore;

#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupStore for GroupRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Group>> {
        sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find group", e))
    }

    async fn find_by_tenant(&self, tenant_id: i64) -> AppResult<Vec<Group>> {
        sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE tenant_id = $1 ORDER BY id")
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list groups of tenant", e)
            })
    }

    async fn create(&self, data: &CreateGroup) -> AppResult<Group> {
        sqlx::query_as::<_, Group>(
            "INSERT INTO groups (tenant_id, name, is_all, properties) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.tenant_id)
        .bind(&data.name)
        .bind(data.is_all)
        .bind(Json(&data.properties))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(format!("Group '{}' already exists", data.name))
            } else if is_foreign_key_violation(&e) {
                AppError::invalid_input(format!("Tenant {} does not exist", data.tenant_id))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create group", e)
            }
        })
    }

    async fn add_member(&self, group_id: i64, user_id: i64) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO group_users (group_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (group_id, user_id) DO NOTHING",
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::not_found(format!("Group {group_id} or user {user_id} not found"))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to add group member", e)
            }
        })?;
        Ok(())
    }

    async fn members(&self, group_id: i64) -> AppResult<Vec<i64>> {
        sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM group_users WHERE group_id = $1 ORDER BY user_id",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list group members", e))
    }

    async fn delete_by_tenant(&self, tenant_id: i64) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query(
            "DELETE FROM group_users WHERE group_id IN (SELECT id FROM groups WHERE tenant_id = $1)",
        )
        .bind(tenant_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete group memberships", e)
        })?;

        let result = sqlx::query("DELETE FROM groups WHERE tenant_id = $1")
            .bind(tenant_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete groups", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(result.rows_affected())
    }
}
