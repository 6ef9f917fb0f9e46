//! PostgreSQL implementation of the record store.
//!
//! Uses sqlx runtime queries mapped onto `FromRow` models.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use uuid::Uuid;

use crate::models::{ApiKey, Category, CategoryChanges};
use crate::services::{SecretStore, ServiceError};

/// Unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store from a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(err: sqlx::Error, what: &str) -> ServiceError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            ServiceError::Duplicate(format!("{} already exists", what))
        }
        _ => ServiceError::Database(err),
    }
}

#[async_trait]
impl SecretStore for PgStore {
    async fn health_check(&self) -> Result<(), ServiceError> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map_err(|e| {
            tracing::error!("Database health check failed: {}", e);
            ServiceError::Database(e)
        })?;
        Ok(())
    }

    // ==================== API Key Operations ====================

    async fn insert_api_key(&self, key: &ApiKey) -> Result<(), ServiceError> {
        sqlx::query(
            r#"
            INSERT INTO api_keys (id, name, secret_hash, active, expires_at, last_used_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(key.id)
        .bind(&key.name)
        .bind(&key.secret_hash)
        .bind(key.active)
        .bind(key.expires_at)
        .bind(key.last_used_at)
        .bind(key.created_at)
        .bind(key.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "API key"))?;
        Ok(())
    }

    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, ServiceError> {
        let keys = sqlx::query_as::<_, ApiKey>("SELECT * FROM api_keys ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }

    async fn find_api_key_by_hash(&self, secret_hash: &str) -> Result<Option<ApiKey>, ServiceError> {
        let key = sqlx::query_as::<_, ApiKey>("SELECT * FROM api_keys WHERE secret_hash = $1")
            .bind(secret_hash)
            .fetch_optional(&self.pool)
            .await?;
        Ok(key)
    }

    async fn find_api_key_by_id(&self, id: Uuid) -> Result<Option<ApiKey>, ServiceError> {
        let key = sqlx::query_as::<_, ApiKey>("SELECT * FROM api_keys WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(key)
    }

    async fn set_api_key_active(&self, id: Uuid, active: bool) -> Result<Option<ApiKey>, ServiceError> {
        let key = sqlx::query_as::<_, ApiKey>(
            "UPDATE api_keys SET active = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(key)
    }

    async fn touch_api_key(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), ServiceError> {
        sqlx::query("UPDATE api_keys SET last_used_at = $1 WHERE id = $2")
            .bind(used_at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_api_key(&self, id: Uuid) -> Result<bool, ServiceError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ==================== Category Operations ====================

    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, ServiceError> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn insert_category(&self, category: &Category) -> Result<(), ServiceError> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(category.active)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "Category"))?;
        Ok(())
    }

    async fn update_category(
        &self,
        id: Uuid,
        changes: CategoryChanges,
    ) -> Result<Option<Category>, ServiceError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = COALESCE($1, name),
                active = COALESCE($2, active),
                updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(changes.name)
        .bind(changes.active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, ServiceError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
