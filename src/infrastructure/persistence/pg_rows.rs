//! Row types and shared queries for the PostgreSQL repositories.
//!
//! Link order is kept in a `position` column; rows are always read back
//! `ORDER BY position`.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::json;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::domain::cascade::{CascadePlan, DeletionTarget, OrderLinkKey, PlacementKey};
use crate::domain::entities::{Board, Component, Order};
use crate::domain::error::DomainError;
use crate::error::AppError;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ComponentRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub quantity: i32,
}

impl TryFrom<ComponentRow> for Component {
    type Error = AppError;

    fn try_from(row: ComponentRow) -> Result<Self, Self::Error> {
        Component::with_id(row.id, &row.name, &row.description, row.quantity).map_err(corrupt_row)
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct BoardRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub length: f64,
    pub width: f64,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PlacementRow {
    pub board_id: Uuid,
    pub component_id: Uuid,
    pub placement_quantity: i32,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub order_date: DateTime<Utc>,
    pub order_date_offset: i32,
}

impl OrderRow {
    fn order_date(&self) -> Result<DateTime<FixedOffset>, AppError> {
        let offset = FixedOffset::east_opt(self.order_date_offset).ok_or_else(|| {
            AppError::internal(
                "Stored order date offset is out of range",
                json!({ "order_id": self.id, "offset": self.order_date_offset }),
            )
        })?;
        Ok(self.order_date.with_timezone(&offset))
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OrderLinkRow {
    pub order_id: Uuid,
    pub board_id: Uuid,
}

/// Stored rows that no longer satisfy entity invariants are a server fault,
/// not a client validation error.
pub(crate) fn corrupt_row(e: DomainError) -> AppError {
    tracing::error!(error = %e, "Stored row violates entity invariants");
    AppError::internal("Corrupt stored data", json!({}))
}

pub(crate) const BOARD_COLUMNS: &str = "id, name, description, length, width";
pub(crate) const ORDER_COLUMNS: &str = "id, name, description, order_date, order_date_offset";

/// Loads boards with their placements, in the order of `ids`.
pub(crate) async fn load_boards(conn: &mut PgConnection, ids: &[Uuid]) -> Result<Vec<Board>, AppError> {
    let rows: Vec<BoardRow> =
        sqlx::query_as(&format!("SELECT {BOARD_COLUMNS} FROM boards WHERE id = ANY($1)"))
            .bind(ids)
            .fetch_all(&mut *conn)
            .await?;

    let placements: Vec<PlacementRow> = sqlx::query_as(
        r#"
        SELECT board_id, component_id, placement_quantity
        FROM board_components
        WHERE board_id = ANY($1)
        ORDER BY board_id, position
        "#,
    )
    .bind(ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_board: HashMap<Uuid, Vec<(Uuid, i32)>> = HashMap::new();
    for p in placements {
        by_board
            .entry(p.board_id)
            .or_default()
            .push((p.component_id, p.placement_quantity));
    }

    let mut boards: HashMap<Uuid, Board> = HashMap::with_capacity(rows.len());
    for row in rows {
        let links = by_board.remove(&row.id).unwrap_or_default();
        let board = Board::restore(row.id, &row.name, &row.description, row.length, row.width, links)
            .map_err(corrupt_row)?;
        boards.insert(board.id(), board);
    }

    Ok(ids.iter().filter_map(|id| boards.remove(id)).collect())
}

/// Loads orders with their board links, in the order of `rows`.
pub(crate) async fn load_orders(conn: &mut PgConnection, rows: Vec<OrderRow>) -> Result<Vec<Order>, AppError> {
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let links: Vec<OrderLinkRow> = sqlx::query_as(
        r#"
        SELECT order_id, board_id
        FROM order_boards
        WHERE order_id = ANY($1)
        ORDER BY order_id, position
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_order: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for link in links {
        by_order.entry(link.order_id).or_default().push(link.board_id);
    }

    rows.into_iter()
        .map(|row| {
            let order_date = row.order_date()?;
            let board_ids = by_order.remove(&row.id).unwrap_or_default();
            Order::restore(row.id, &row.name, &row.description, order_date, board_ids)
                .map_err(corrupt_row)
        })
        .collect()
}

/// Replaces every placement row of `board`.
pub(crate) async fn write_placements(conn: &mut PgConnection, board: &Board) -> Result<(), AppError> {
    sqlx::query("DELETE FROM board_components WHERE board_id = $1")
        .bind(board.id())
        .execute(&mut *conn)
        .await?;

    let links = board.component_links();
    if links.is_empty() {
        return Ok(());
    }

    let component_ids: Vec<Uuid> = links.iter().map(|l| l.component_id()).collect();
    let quantities: Vec<i32> = links.iter().map(|l| l.placement_quantity()).collect();
    let positions: Vec<i32> = (0..links.len() as i32).collect();

    sqlx::query(
        r#"
        INSERT INTO board_components (board_id, component_id, placement_quantity, position)
        SELECT $1, t.component_id, t.placement_quantity, t.position
        FROM UNNEST($2::uuid[], $3::int4[], $4::int4[]) AS t(component_id, placement_quantity, position)
        "#,
    )
    .bind(board.id())
    .bind(&component_ids)
    .bind(&quantities)
    .bind(&positions)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Replaces every board link row of `order`.
pub(crate) async fn write_order_links(conn: &mut PgConnection, order: &Order) -> Result<(), AppError> {
    sqlx::query("DELETE FROM order_boards WHERE order_id = $1")
        .bind(order.id())
        .execute(&mut *conn)
        .await?;

    let board_ids: Vec<Uuid> = order.board_ids().collect();
    if board_ids.is_empty() {
        return Ok(());
    }
    let positions: Vec<i32> = (0..board_ids.len() as i32).collect();

    sqlx::query(
        r#"
        INSERT INTO order_boards (order_id, board_id, position)
        SELECT $1, t.board_id, t.position
        FROM UNNEST($2::uuid[], $3::int4[]) AS t(board_id, position)
        "#,
    )
    .bind(order.id())
    .bind(&board_ids)
    .bind(&positions)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Deletes a root and every link row referencing it inside one transaction.
///
/// Phase one locks the root and selects the affected link keys `FOR UPDATE`;
/// phase two deletes exactly those keys and then the root. Returns `false`
/// when the root does not exist.
pub(crate) async fn delete_root(pool: &sqlx::PgPool, target: DeletionTarget) -> Result<bool, AppError> {
    let id = target.id();
    let table = match target {
        DeletionTarget::Component(_) => "components",
        DeletionTarget::Board(_) => "boards",
        DeletionTarget::Order(_) => "orders",
    };

    let mut tx = pool.begin().await?;

    let locked: Option<Uuid> =
        sqlx::query_scalar(&format!("SELECT id FROM {table} WHERE id = $1 FOR UPDATE"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    if locked.is_none() {
        tx.rollback().await?;
        return Ok(false);
    }

    let mut plan = CascadePlan::new(target);

    if target.cascades_to_placements() {
        let column = match target {
            DeletionTarget::Component(_) => "component_id",
            _ => "board_id",
        };
        let keys: Vec<PlacementRow> = sqlx::query_as(&format!(
            "SELECT board_id, component_id, placement_quantity FROM board_components WHERE {column} = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;
        plan = plan.with_placements(keys.into_iter().map(|k| PlacementKey {
            board_id: k.board_id,
            component_id: k.component_id,
        }));
    }

    if target.cascades_to_order_links() {
        let column = match target {
            DeletionTarget::Order(_) => "order_id",
            _ => "board_id",
        };
        let keys: Vec<OrderLinkRow> = sqlx::query_as(&format!(
            "SELECT order_id, board_id FROM order_boards WHERE {column} = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;
        plan = plan.with_order_links(keys.into_iter().map(|k| OrderLinkKey {
            order_id: k.order_id,
            board_id: k.board_id,
        }));
    }

    if !plan.placements().is_empty() {
        let (boards, components): (Vec<Uuid>, Vec<Uuid>) = plan
            .placements()
            .iter()
            .map(|k| (k.board_id, k.component_id))
            .unzip();
        sqlx::query(
            r#"
            DELETE FROM board_components bc
            USING UNNEST($1::uuid[], $2::uuid[]) AS k(board_id, component_id)
            WHERE bc.board_id = k.board_id AND bc.component_id = k.component_id
            "#,
        )
        .bind(&boards)
        .bind(&components)
        .execute(&mut *tx)
        .await?;
    }

    if !plan.order_links().is_empty() {
        let (orders, boards): (Vec<Uuid>, Vec<Uuid>) = plan
            .order_links()
            .iter()
            .map(|k| (k.order_id, k.board_id))
            .unzip();
        sqlx::query(
            r#"
            DELETE FROM order_boards ob
            USING UNNEST($1::uuid[], $2::uuid[]) AS k(order_id, board_id)
            WHERE ob.order_id = k.order_id AND ob.board_id = k.board_id
            "#,
        )
        .bind(&orders)
        .bind(&boards)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::debug!(
        kind = target.kind(),
        id = %id,
        links_removed = plan.link_count(),
        "Cascade delete committed"
    );
    Ok(true)
}

/// `true` if a row with `id` exists in `table`.
pub(crate) async fn row_exists(pool: &sqlx::PgPool, table: &'static str, id: Uuid) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar(&format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1)"))
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

pub(crate) fn row_missing(kind: &str, id: Uuid) -> AppError {
    AppError::not_found(format!("{kind} not found"), json!({ "kind": kind, "id": id }))
}
