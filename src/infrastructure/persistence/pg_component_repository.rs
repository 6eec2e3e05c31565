//! PostgreSQL implementation of the component repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::pg_rows::{ComponentRow, delete_root, row_missing};
use crate::domain::cascade::DeletionTarget;
use crate::domain::entities::Component;
use crate::domain::paging::Paging;
use crate::domain::repositories::ComponentRepository;
use crate::error::AppError;

/// PostgreSQL repository for catalog components.
pub struct PgComponentRepository {
    pool: Arc<PgPool>,
}

impl PgComponentRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComponentRepository for PgComponentRepository {
    async fn insert(&self, component: &Component) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO components (id, name, description, quantity)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(component.id())
        .bind(component.name())
        .bind(component.description())
        .bind(component.quantity())
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Component>, AppError> {
        let row: Option<ComponentRow> = sqlx::query_as(
            "SELECT id, name, description, quantity FROM components WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Component::try_from).transpose()
    }

    async fn search(&self, name: Option<String>, paging: Paging) -> Result<Vec<Component>, AppError> {
        let rows: Vec<ComponentRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, quantity
            FROM components
            WHERE $1::text IS NULL OR strpos(lower(name), lower($1)) > 0
            ORDER BY lower(name) COLLATE "C", name COLLATE "C", id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(name)
        .bind(paging.skip)
        .bind(paging.take)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Component::try_from).collect()
    }

    async fn save(&self, component: &Component) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE components
            SET name = $2, description = $3, quantity = $4
            WHERE id = $1
            "#,
        )
        .bind(component.id())
        .bind(component.name())
        .bind(component.description())
        .bind(component.quantity())
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(row_missing(Component::KIND, component.id()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        delete_root(&self.pool, DeletionTarget::Component(id)).await
    }
}
