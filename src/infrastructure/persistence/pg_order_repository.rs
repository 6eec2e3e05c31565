//! PostgreSQL implementation of the order repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::pg_rows::{
    ComponentRow, ORDER_COLUMNS, OrderRow, delete_root, load_boards, load_orders,
    write_order_links,
};
use crate::domain::bom::OrderGraph;
use crate::domain::cascade::DeletionTarget;
use crate::domain::entities::{Component, Order};
use crate::domain::paging::Paging;
use crate::domain::repositories::{OrderChange, OrderRepository};
use crate::error::AppError;

/// PostgreSQL repository for orders.
///
/// `order_date` is stored as a UTC instant plus the caller's offset in
/// seconds, so the original offset survives a round trip. `modify` holds a
/// row lock on the order for the whole read-modify-write.
pub struct PgOrderRepository {
    pool: Arc<PgPool>,
}

impl PgOrderRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn insert(&self, order: &Order) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, name, description, order_date, order_date_offset)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.id())
        .bind(order.name())
        .bind(order.description())
        .bind(order.order_date().to_utc())
        .bind(order.order_date().offset().local_minus_utc())
        .execute(&mut *tx)
        .await?;

        write_order_links(&mut *tx, order).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id)
                .fetch_all(&mut *conn)
                .await?;

        Ok(load_orders(&mut *conn, rows).await?.pop())
    }

    async fn search(&self, name: Option<String>, paging: Paging) -> Result<Vec<Order>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE $1::text IS NULL OR strpos(lower(name), lower($1)) > 0
            ORDER BY order_date DESC, id
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(name)
        .bind(paging.skip)
        .bind(paging.take)
        .fetch_all(&mut *conn)
        .await?;

        load_orders(&mut *conn, rows).await
    }

    async fn modify(&self, id: Uuid, change: OrderChange) -> Result<Option<Order>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        let Some(mut order) = load_orders(&mut *tx, vec![row]).await?.pop() else {
            tx.rollback().await?;
            return Ok(None);
        };
        if let Err(e) = change(&mut order) {
            tx.rollback().await?;
            return Err(e.into());
        }

        sqlx::query(
            r#"
            UPDATE orders
            SET name = $2, description = $3, order_date = $4, order_date_offset = $5
            WHERE id = $1
            "#,
        )
        .bind(order.id())
        .bind(order.name())
        .bind(order.description())
        .bind(order.order_date().to_utc())
        .bind(order.order_date().offset().local_minus_utc())
        .execute(&mut *tx)
        .await?;

        write_order_links(&mut *tx, &order).await?;

        tx.commit().await?;
        Ok(Some(order))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        delete_root(&self.pool, DeletionTarget::Order(id)).await
    }

    async fn load_graph(&self, order_id: Uuid) -> Result<Option<OrderGraph>, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        let Some(order) = load_orders(&mut *tx, vec![row]).await?.pop() else {
            tx.rollback().await?;
            return Ok(None);
        };

        let board_ids: Vec<Uuid> = order.board_ids().collect();
        let boards = load_boards(&mut *tx, &board_ids).await?;

        let component_ids = OrderGraph::referenced_component_ids(&boards);
        let rows: Vec<ComponentRow> = sqlx::query_as(
            "SELECT id, name, description, quantity FROM components WHERE id = ANY($1)",
        )
        .bind(&component_ids)
        .fetch_all(&mut *tx)
        .await?;
        let components = rows
            .into_iter()
            .map(Component::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tx.commit().await?;
        Ok(Some(OrderGraph::new(order, boards, components)))
    }
}
