//! Existence checks for roots referenced by links.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;

/// Answers whether a root can be linked to.
///
/// Entities never check this themselves; services ask before creating a link.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn component_exists(&self, id: Uuid) -> Result<bool, AppError>;

    async fn board_exists(&self, id: Uuid) -> Result<bool, AppError>;
}
