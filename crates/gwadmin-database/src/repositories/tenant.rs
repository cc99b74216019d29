//! Tenant repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use gwadmin_core::error::{AppError, ErrorKind};
use gwadmin_core::result::AppResult;
use gwadmin_entity::Tenant;
use gwadmin_entity::tenant::CreateTenant;

use super::is_unique_violation;
use crate::store::TenantStore;

#[derive(Debug, Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantStore for TenantRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Tenant>> {
        sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find tenant", e))
    }

    async fn find_by_web_domain(&self, domain: &str) -> AppResult<Option<Tenant>> {
        sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE web_domain <> '' AND LOWER(web_domain) = LOWER($1) \
             ORDER BY id LIMIT 1",
        )
        .bind(domain)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find tenant by web domain", e)
        })
    }

    async fn find_default(&self) -> AppResult<Option<Tenant>> {
        sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE is_default ORDER BY id LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find default tenant", e)
            })
    }

    async fn find_by_channel(&self, channel_id: i64) -> AppResult<Vec<Tenant>> {
        sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE channel_id = $1 ORDER BY id")
            .bind(channel_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list tenants of channel", e)
            })
    }

    async fn create(&self, data: &CreateTenant) -> AppResult<Tenant> {
        if data.channel_id != 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM channels WHERE id = $1)")
                    .bind(data.channel_id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to check channel", e)
                    })?;
            if !exists {
                return Err(AppError::invalid_input(format!(
                    "Channel {} does not exist",
                    data.channel_id
                )));
            }
        }

        sqlx::query_as::<_, Tenant>(
            "INSERT INTO tenants \
                (channel_id, is_disabled, is_default, name, description, web_domain, properties) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(data.channel_id)
        .bind(data.is_disabled)
        .bind(data.is_default)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.web_domain)
        .bind(Json(&data.properties))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(format!("Tenant '{}' already exists", data.name))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create tenant", e)
            }
        })
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete tenant", e))?;

        Ok(result.rows_affected() > 0)
    }
}
