//! Repository trait for boards and their placements.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Board;
use crate::domain::error::DomainError;
use crate::domain::paging::Paging;
use crate::error::AppError;

/// An edit applied to a stored board by [`BoardRepository::modify`].
pub type BoardChange = Box<dyn FnOnce(&mut Board) -> Result<(), DomainError> + Send>;

/// Persistence contract for [`Board`] roots.
///
/// A board is always read and written together with its component links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoardRepository: Send + Sync {
    async fn insert(&self, board: &Board) -> Result<(), AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Board>, AppError>;

    /// Lists boards ordered by name.
    async fn search(&self, name: Option<String>, paging: Paging) -> Result<Vec<Board>, AppError>;

    /// Loads the board, applies `change` and persists fields and placements,
    /// all while holding the board exclusively. Concurrent modifications of
    /// the same board are serialized, so none of them is lost.
    ///
    /// Returns `None` when the board does not exist. Nothing is written when
    /// `change` fails.
    ///
    /// # Errors
    ///
    /// - the error returned by `change`, converted to [`AppError`]
    /// - [`AppError::NotFound`] if a placed component no longer exists
    async fn modify(&self, id: Uuid, change: BoardChange) -> Result<Option<Board>, AppError>;

    /// Deletes a board, its placements and every order link to it.
    ///
    /// Returns `false` when the board does not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
