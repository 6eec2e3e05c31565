//! Board service: board CRUD and component placement orchestration.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::Board;
use crate::domain::paging::{Paging, normalize_filter};
use crate::domain::repositories::{BoardChange, BoardRepository, CatalogLookup};
use crate::error::AppError;

/// Field values for creating or replacing a board.
#[derive(Debug, Clone)]
pub struct BoardInput {
    pub name: String,
    pub description: String,
    pub length: f64,
    pub width: f64,
}

/// Orchestrates board mutations.
///
/// Link operations follow one shape: make sure the board exists, check any
/// newly referenced component through the catalog, then hand the domain
/// operation to [`BoardRepository::modify`], which runs it against the
/// stored board under an exclusive lock. Two concurrent edits of one board
/// therefore both land.
pub struct BoardService<B, C>
where
    B: BoardRepository + ?Sized,
    C: CatalogLookup + ?Sized,
{
    repository: Arc<B>,
    catalog: Arc<C>,
}

impl<B, C> BoardService<B, C>
where
    B: BoardRepository + ?Sized,
    C: CatalogLookup + ?Sized,
{
    pub fn new(repository: Arc<B>, catalog: Arc<C>) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    pub async fn create(&self, input: BoardInput) -> Result<Board, AppError> {
        let board = Board::new(&input.name, &input.description, input.length, input.width)?;
        self.repository.insert(&board).await?;

        metrics::counter!("smt_entities_created_total", "kind" => Board::KIND).increment(1);
        info!(board_id = %board.id(), name = board.name(), "Board created");
        Ok(board)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the board does not exist.
    pub async fn get(&self, id: Uuid) -> Result<Board, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| board_not_found(id))
    }

    pub async fn search(&self, name: Option<&str>, paging: Paging) -> Result<Vec<Board>, AppError> {
        self.repository.search(normalize_filter(name), paging).await
    }

    /// Replaces name, description and dimensions. Placements are kept.
    pub async fn update(&self, id: Uuid, input: BoardInput) -> Result<Board, AppError> {
        let board = self
            .modify(
                id,
                Box::new(move |board: &mut Board| {
                    board.update(&input.name, &input.description, input.length, input.width)
                }),
            )
            .await?;

        info!(board_id = %id, "Board updated");
        Ok(board)
    }

    /// Deletes a board, its placements and its order memberships.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            metrics::counter!("smt_entities_deleted_total", "kind" => Board::KIND).increment(1);
            info!(board_id = %id, "Board deleted");
        }
        Ok(deleted)
    }

    /// Places a catalog component on a board.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the board or the component does not exist
    /// - [`AppError::Conflict`] if the component is already placed
    /// - [`AppError::Validation`] if `placement_quantity <= 0`
    pub async fn add_component(
        &self,
        board_id: Uuid,
        component_id: Uuid,
        placement_quantity: i32,
    ) -> Result<Board, AppError> {
        self.get(board_id).await?;

        if !self.catalog.component_exists(component_id).await? {
            return Err(AppError::not_found(
                "Component not found",
                json!({ "id": component_id }),
            ));
        }

        let board = self
            .modify(
                board_id,
                Box::new(move |board: &mut Board| board.add_component(component_id, placement_quantity)),
            )
            .await?;

        info!(
            board_id = %board_id,
            component_id = %component_id,
            placement_quantity,
            "Component placed on board"
        );
        Ok(board)
    }

    /// Removes a placement. The component stays in the catalog.
    pub async fn remove_component(&self, board_id: Uuid, component_id: Uuid) -> Result<Board, AppError> {
        let board = self
            .modify(board_id, Box::new(move |board: &mut Board| board.remove_component(component_id)))
            .await?;

        info!(board_id = %board_id, component_id = %component_id, "Component removed from board");
        Ok(board)
    }

    pub async fn update_component_quantity(
        &self,
        board_id: Uuid,
        component_id: Uuid,
        placement_quantity: i32,
    ) -> Result<Board, AppError> {
        let board = self
            .modify(
                board_id,
                Box::new(move |board: &mut Board| {
                    board.update_component_quantity(component_id, placement_quantity)
                }),
            )
            .await?;

        info!(
            board_id = %board_id,
            component_id = %component_id,
            placement_quantity,
            "Placement quantity updated"
        );
        Ok(board)
    }

    async fn modify(&self, id: Uuid, change: BoardChange) -> Result<Board, AppError> {
        self.repository
            .modify(id, change)
            .await?
            .ok_or_else(|| board_not_found(id))
    }
}

fn board_not_found(id: Uuid) -> AppError {
    AppError::not_found("Board not found", json!({ "id": id }))
}
