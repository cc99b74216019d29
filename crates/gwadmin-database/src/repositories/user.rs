//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use gwadmin_core::error::{AppError, ErrorKind};
use gwadmin_core::result::AppResult;
use gwadmin_entity::user::CreateUser;
use gwadmin_entity::{Properties, Role, User};

use super::{is_foreign_key_violation, is_unique_violation};
use crate::store::UserStore;

/// Repository for user rows.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn find_by_public_id(&self, public_id: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(public_id) = LOWER($1)")
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by public id", e)
            })
    }

    async fn find_by_tenant(&self, tenant_id: i64) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE tenant_id = $1 ORDER BY id")
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list users of tenant", e)
            })
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        if data.role == Role::SuperAdmin {
            return Err(AppError::invalid_input(
                "The SuperAdmin role cannot be assigned to a stored user",
            ));
        }

        sqlx::query_as::<_, User>(
            "INSERT INTO users \
                (uuid, name, public_id, password_hash, tenant_id, role, \
                 language, time_format, date_format, properties) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.public_id)
        .bind(&data.password_hash)
        .bind(data.tenant_id)
        .bind(data.role)
        .bind(&data.language)
        .bind(&data.time_format)
        .bind(&data.date_format)
        .bind(Json(Properties::default()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(format!("User '{}' already exists", data.public_id))
            } else if is_foreign_key_violation(&e) {
                AppError::invalid_input(format!("Tenant {} does not exist", data.tenant_id))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create user", e)
            }
        })
    }

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET last_login = $2, logins_count = logins_count + 1 WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record login", e))?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        // group_users rows go with the user through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }
}
