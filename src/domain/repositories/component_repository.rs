//! Repository trait for the component catalog.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Component;
use crate::domain::paging::Paging;
use crate::error::AppError;

/// Persistence contract for [`Component`] roots.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryStore`] - in-process store
/// - [`crate::infrastructure::persistence::PgComponentRepository`] - PostgreSQL
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComponentRepository: Send + Sync {
    /// Stores a new component.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the id is already taken.
    async fn insert(&self, component: &Component) -> Result<(), AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Component>, AppError>;

    /// Lists components ordered by name, optionally filtered by a
    /// case-insensitive name substring.
    async fn search(&self, name: Option<String>, paging: Paging) -> Result<Vec<Component>, AppError>;

    /// Overwrites the stored fields of an existing component.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the component was deleted meanwhile.
    async fn save(&self, component: &Component) -> Result<(), AppError>;

    /// Deletes a component together with every placement of it.
    ///
    /// Returns `false` when the component does not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
