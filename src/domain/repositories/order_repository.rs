//! Repository trait for orders.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::bom::OrderGraph;
use crate::domain::entities::Order;
use crate::domain::error::DomainError;
use crate::domain::paging::Paging;
use crate::error::AppError;

/// An edit applied to a stored order by [`OrderRepository::modify`].
pub type OrderChange = Box<dyn FnOnce(&mut Order) -> Result<(), DomainError> + Send>;

/// Persistence contract for [`Order`] roots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: &Order) -> Result<(), AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError>;

    /// Lists orders, newest `order_date` first.
    async fn search(&self, name: Option<String>, paging: Paging) -> Result<Vec<Order>, AppError>;

    /// Applies `change` to the stored order and persists it with its board
    /// links as one exclusive read-modify-write. `None` if the order is gone.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if a linked board no longer exists.
    async fn modify(&self, id: Uuid, change: OrderChange) -> Result<Option<Order>, AppError>;

    /// Deletes an order and its board links. Boards are kept.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Reads the order, its linked boards and their components as one
    /// consistent snapshot.
    ///
    /// Returns `None` when the order does not exist.
    async fn load_graph(&self, order_id: Uuid) -> Result<Option<OrderGraph>, AppError>;
}
