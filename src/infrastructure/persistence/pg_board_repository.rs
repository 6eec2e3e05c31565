//! PostgreSQL implementation of the board repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::pg_rows::{delete_root, load_boards, write_placements};
use crate::domain::cascade::DeletionTarget;
use crate::domain::entities::Board;
use crate::domain::paging::Paging;
use crate::domain::repositories::{BoardChange, BoardRepository};
use crate::error::AppError;

/// PostgreSQL repository for boards.
///
/// `modify` locks the board row (`SELECT ... FOR UPDATE`) before reading it,
/// so concurrent edits of one board queue up behind each other. Fields and
/// placement rows are written in the same transaction. A placement of a
/// component deleted in the meantime fails the foreign key and surfaces as
/// [`AppError::NotFound`].
pub struct PgBoardRepository {
    pool: Arc<PgPool>,
}

impl PgBoardRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardRepository for PgBoardRepository {
    async fn insert(&self, board: &Board) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO boards (id, name, description, length, width)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(board.id())
        .bind(board.name())
        .bind(board.description())
        .bind(board.length())
        .bind(board.width())
        .execute(&mut *tx)
        .await?;

        write_placements(&mut *tx, board).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Board>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let mut boards = load_boards(&mut *conn, &[id]).await?;
        Ok(boards.pop())
    }

    async fn search(&self, name: Option<String>, paging: Paging) -> Result<Vec<Board>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM boards
            WHERE $1::text IS NULL OR strpos(lower(name), lower($1)) > 0
            ORDER BY lower(name) COLLATE "C", name COLLATE "C", id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(name)
        .bind(paging.skip)
        .bind(paging.take)
        .fetch_all(&mut *conn)
        .await?;

        load_boards(&mut *conn, &ids).await
    }

    async fn modify(&self, id: Uuid, change: BoardChange) -> Result<Option<Board>, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM boards WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let Some(mut board) = load_boards(&mut *tx, &[id]).await?.pop() else {
            tx.rollback().await?;
            return Ok(None);
        };
        if let Err(e) = change(&mut board) {
            tx.rollback().await?;
            return Err(e.into());
        }

        sqlx::query(
            r#"
            UPDATE boards
            SET name = $2, description = $3, length = $4, width = $5
            WHERE id = $1
            "#,
        )
        .bind(board.id())
        .bind(board.name())
        .bind(board.description())
        .bind(board.length())
        .bind(board.width())
        .execute(&mut *tx)
        .await?;

        write_placements(&mut *tx, &board).await?;

        tx.commit().await?;
        Ok(Some(board))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        delete_root(&self.pool, DeletionTarget::Board(id)).await
    }
}
