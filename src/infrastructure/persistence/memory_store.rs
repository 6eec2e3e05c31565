//! In-process storage backend.
//!
//! One [`RwLock`] guards every table, so each repository call (including a
//! cascading delete and a `modify` read-modify-write) is atomic with respect
//! to every other call. Readers see either the whole effect of a delete or
//! none of it.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::bom::OrderGraph;
use crate::domain::cascade::{CascadePlan, DeletionTarget};
use crate::domain::entities::{Board, Component, Order};
use crate::domain::paging::{Paging, matches_filter};
use crate::domain::repositories::{
    BoardChange, BoardRepository, CatalogLookup, ComponentRepository, OrderChange, OrderRepository,
};
use crate::error::AppError;

#[derive(Debug, Default)]
struct Tables {
    components: HashMap<Uuid, Component>,
    boards: HashMap<Uuid, Board>,
    orders: HashMap<Uuid, Order>,
}

impl Tables {
    /// Runs both cascade phases and removes the root. Must be called under
    /// the write guard.
    fn delete(&mut self, target: DeletionTarget) -> bool {
        let exists = match target {
            DeletionTarget::Component(id) => self.components.contains_key(&id),
            DeletionTarget::Board(id) => self.boards.contains_key(&id),
            DeletionTarget::Order(id) => self.orders.contains_key(&id),
        };
        if !exists {
            return false;
        }

        let plan = CascadePlan::collect(target, self.boards.values(), self.orders.values());

        for board_id in plan.affected_boards() {
            if let Some(board) = self.boards.get_mut(&board_id) {
                plan.apply_to_board(board);
            }
        }
        for order_id in plan.affected_orders() {
            if let Some(order) = self.orders.get_mut(&order_id) {
                plan.apply_to_order(order);
            }
        }

        match target {
            DeletionTarget::Component(id) => {
                self.components.remove(&id);
            }
            DeletionTarget::Board(id) => {
                self.boards.remove(&id);
            }
            DeletionTarget::Order(id) => {
                self.orders.remove(&id);
            }
        }

        debug!(
            kind = target.kind(),
            id = %target.id(),
            links_removed = plan.link_count(),
            "Cascade delete applied"
        );
        true
    }
}

/// Thread-safe in-memory implementation of every repository trait and of
/// [`CatalogLookup`]. Cloning shares the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_name(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn duplicate_id(kind: &str, id: Uuid) -> AppError {
    AppError::conflict(
        format!("{kind} already exists"),
        json!({ "kind": kind, "id": id }),
    )
}

fn missing(kind: &str, id: Uuid) -> AppError {
    AppError::not_found(format!("{kind} not found"), json!({ "kind": kind, "id": id }))
}

#[async_trait]
impl ComponentRepository for MemoryStore {
    async fn insert(&self, component: &Component) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if tables.components.contains_key(&component.id()) {
            return Err(duplicate_id(Component::KIND, component.id()));
        }
        tables.components.insert(component.id(), component.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Component>, AppError> {
        Ok(self.tables.read().await.components.get(&id).cloned())
    }

    async fn search(&self, name: Option<String>, paging: Paging) -> Result<Vec<Component>, AppError> {
        let tables = self.tables.read().await;
        let mut found: Vec<&Component> = tables
            .components
            .values()
            .filter(|c| matches_filter(c.name(), name.as_deref()))
            .collect();
        found.sort_by(|a, b| by_name(a.name(), b.name()).then_with(|| a.id().cmp(&b.id())));
        Ok(paging.apply(found.into_iter().cloned()))
    }

    async fn save(&self, component: &Component) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .components
            .get_mut(&component.id())
            .ok_or_else(|| missing(Component::KIND, component.id()))?;
        *slot = component.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.delete(DeletionTarget::Component(id)))
    }
}

#[async_trait]
impl BoardRepository for MemoryStore {
    async fn insert(&self, board: &Board) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if tables.boards.contains_key(&board.id()) {
            return Err(duplicate_id(Board::KIND, board.id()));
        }
        if let Some(link) = board
            .component_links()
            .iter()
            .find(|link| !tables.components.contains_key(&link.component_id()))
        {
            return Err(missing(Component::KIND, link.component_id()));
        }
        tables.boards.insert(board.id(), board.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Board>, AppError> {
        Ok(self.tables.read().await.boards.get(&id).cloned())
    }

    async fn search(&self, name: Option<String>, paging: Paging) -> Result<Vec<Board>, AppError> {
        let tables = self.tables.read().await;
        let mut found: Vec<&Board> = tables
            .boards
            .values()
            .filter(|b| matches_filter(b.name(), name.as_deref()))
            .collect();
        found.sort_by(|a, b| by_name(a.name(), b.name()).then_with(|| a.id().cmp(&b.id())));
        Ok(paging.apply(found.into_iter().cloned()))
    }

    async fn modify(&self, id: Uuid, change: BoardChange) -> Result<Option<Board>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(mut board) = tables.boards.get(&id).cloned() else {
            return Ok(None);
        };
        change(&mut board)?;

        if let Some(link) = board
            .component_links()
            .iter()
            .find(|link| !tables.components.contains_key(&link.component_id()))
        {
            return Err(missing(Component::KIND, link.component_id()));
        }
        tables.boards.insert(id, board.clone());
        Ok(Some(board))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.delete(DeletionTarget::Board(id)))
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn insert(&self, order: &Order) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if tables.orders.contains_key(&order.id()) {
            return Err(duplicate_id(Order::KIND, order.id()));
        }
        if let Some(board_id) = order.board_ids().find(|id| !tables.boards.contains_key(id)) {
            return Err(missing(Board::KIND, board_id));
        }
        tables.orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn search(&self, name: Option<String>, paging: Paging) -> Result<Vec<Order>, AppError> {
        let tables = self.tables.read().await;
        let mut found: Vec<&Order> = tables
            .orders
            .values()
            .filter(|o| matches_filter(o.name(), name.as_deref()))
            .collect();
        found.sort_by(|a, b| {
            b.order_date()
                .cmp(&a.order_date())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(paging.apply(found.into_iter().cloned()))
    }

    async fn modify(&self, id: Uuid, change: OrderChange) -> Result<Option<Order>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(mut order) = tables.orders.get(&id).cloned() else {
            return Ok(None);
        };
        change(&mut order)?;

        if let Some(board_id) = order.board_ids().find(|b| !tables.boards.contains_key(b)) {
            return Err(missing(Board::KIND, board_id));
        }
        tables.orders.insert(id, order.clone());
        Ok(Some(order))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.delete(DeletionTarget::Order(id)))
    }

    async fn load_graph(&self, order_id: Uuid) -> Result<Option<OrderGraph>, AppError> {
        let tables = self.tables.read().await;
        let Some(order) = tables.orders.get(&order_id) else {
            return Ok(None);
        };

        let boards: Vec<Board> = order
            .board_ids()
            .filter_map(|id| tables.boards.get(&id).cloned())
            .collect();
        let components: Vec<Component> = OrderGraph::referenced_component_ids(&boards)
            .iter()
            .filter_map(|id| tables.components.get(id).cloned())
            .collect();

        Ok(Some(OrderGraph::new(order.clone(), boards, components)))
    }
}

#[async_trait]
impl CatalogLookup for MemoryStore {
    async fn component_exists(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.read().await.components.contains_key(&id))
    }

    async fn board_exists(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.read().await.boards.contains_key(&id))
    }
}
