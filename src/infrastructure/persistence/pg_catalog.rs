//! PostgreSQL existence checks.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::pg_rows::row_exists;
use crate::domain::repositories::CatalogLookup;
use crate::error::AppError;

pub struct PgCatalog {
    pool: Arc<PgPool>,
}

impl PgCatalog {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Row counts of the three root tables, as `(components, boards, orders)`.
    pub async fn counts(&self) -> Result<(i64, i64, i64), AppError> {
        let counts: (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM components),
                (SELECT COUNT(*) FROM boards),
                (SELECT COUNT(*) FROM orders)
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;
        Ok(counts)
    }
}

#[async_trait]
impl CatalogLookup for PgCatalog {
    async fn component_exists(&self, id: Uuid) -> Result<bool, AppError> {
        row_exists(&self.pool, "components", id).await
    }

    async fn board_exists(&self, id: Uuid) -> Result<bool, AppError> {
        row_exists(&self.pool, "boards", id).await
    }
}
