//! Order service: order CRUD, board membership and production downloads.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::application::clock::Clock;
use crate::domain::bom::{ProductionSnapshot, build_snapshot};
use crate::domain::entities::Order;
use crate::domain::paging::{Paging, normalize_filter};
use crate::domain::repositories::{CatalogLookup, OrderChange, OrderRepository};
use crate::error::AppError;

/// Field values for creating or replacing an order.
#[derive(Debug, Clone)]
pub struct OrderInput {
    pub name: String,
    pub description: String,
    pub order_date: DateTime<FixedOffset>,
}

/// A rendered production snapshot ready to be served as a file.
#[derive(Debug, Clone)]
pub struct DownloadPayload {
    pub file_name: String,
    pub content_type: &'static str,
    pub content: Vec<u8>,
}

/// Orchestrates order mutations and BOM exports.
///
/// Membership changes go through [`OrderRepository::modify`], so concurrent
/// link edits of one order are applied one after the other.
pub struct OrderService<O, C>
where
    O: OrderRepository + ?Sized,
    C: CatalogLookup + ?Sized,
{
    repository: Arc<O>,
    catalog: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<O, C> OrderService<O, C>
where
    O: OrderRepository + ?Sized,
    C: CatalogLookup + ?Sized,
{
    pub fn new(repository: Arc<O>, catalog: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            catalog,
            clock,
        }
    }

    pub async fn create(&self, input: OrderInput) -> Result<Order, AppError> {
        let order = Order::new(&input.name, &input.description, input.order_date)?;
        self.repository.insert(&order).await?;

        metrics::counter!("smt_entities_created_total", "kind" => Order::KIND).increment(1);
        info!(order_id = %order.id(), name = order.name(), "Order created");
        Ok(order)
    }

    pub async fn get(&self, id: Uuid) -> Result<Order, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| order_not_found(id))
    }

    pub async fn search(&self, name: Option<&str>, paging: Paging) -> Result<Vec<Order>, AppError> {
        self.repository.search(normalize_filter(name), paging).await
    }

    pub async fn update(&self, id: Uuid, input: OrderInput) -> Result<Order, AppError> {
        let order = self
            .modify(
                id,
                Box::new(move |order: &mut Order| {
                    order.update(&input.name, &input.description, input.order_date)
                }),
            )
            .await?;

        info!(order_id = %id, "Order updated");
        Ok(order)
    }

    /// Deletes an order and its board links. Linked boards are kept.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            metrics::counter!("smt_entities_deleted_total", "kind" => Order::KIND).increment(1);
            info!(order_id = %id, "Order deleted");
        }
        Ok(deleted)
    }

    /// Links an existing board to an order.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the order or the board does not exist
    /// - [`AppError::Conflict`] if the board is already linked
    pub async fn add_board(&self, order_id: Uuid, board_id: Uuid) -> Result<Order, AppError> {
        self.get(order_id).await?;

        if !self.catalog.board_exists(board_id).await? {
            return Err(AppError::not_found("Board not found", json!({ "id": board_id })));
        }

        let order = self
            .modify(order_id, Box::new(move |order: &mut Order| order.add_board(board_id)))
            .await?;

        info!(order_id = %order_id, board_id = %board_id, "Board linked to order");
        Ok(order)
    }

    pub async fn remove_board(&self, order_id: Uuid, board_id: Uuid) -> Result<Order, AppError> {
        let order = self
            .modify(order_id, Box::new(move |order: &mut Order| order.remove_board(board_id)))
            .await?;

        info!(order_id = %order_id, board_id = %board_id, "Board unlinked from order");
        Ok(order)
    }

    /// Aggregates the order's current graph into a production snapshot
    /// stamped with the injected clock.
    pub async fn snapshot(&self, order_id: Uuid) -> Result<ProductionSnapshot, AppError> {
        let graph = self.repository.load_graph(order_id).await?;
        let snapshot = build_snapshot(order_id, graph.as_ref(), self.clock.now_utc())?;
        Ok(snapshot)
    }

    /// Renders the snapshot as a pretty-printed JSON file.
    pub async fn download(&self, order_id: Uuid) -> Result<DownloadPayload, AppError> {
        let snapshot = self.snapshot(order_id).await?;

        let content = serde_json::to_vec_pretty(&snapshot).map_err(|e| {
            AppError::internal("Failed to serialize snapshot", json!({ "reason": e.to_string() }))
        })?;
        let file_name = download_file_name(&snapshot);

        metrics::counter!("smt_order_downloads_total").increment(1);
        info!(
            order_id = %order_id,
            boards = snapshot.boards.len(),
            bom_lines = snapshot.bom.len(),
            file_name = %file_name,
            "Order snapshot downloaded"
        );

        Ok(DownloadPayload {
            file_name,
            content_type: "application/json",
            content,
        })
    }

    async fn modify(&self, id: Uuid, change: OrderChange) -> Result<Order, AppError> {
        self.repository
            .modify(id, change)
            .await?
            .ok_or_else(|| order_not_found(id))
    }
}

/// `order_{id}_{yyyyMMdd_HHmmss}_utc.json`, stamped with the snapshot time.
pub fn download_file_name(snapshot: &ProductionSnapshot) -> String {
    format!(
        "order_{}_{}_utc.json",
        snapshot.order.id,
        snapshot.downloaded_at_utc.format("%Y%m%d_%H%M%S")
    )
}

fn order_not_found(id: Uuid) -> AppError {
    AppError::not_found("Order not found", json!({ "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::FixedClock;
    use crate::domain::bom::OrderGraph;
    use crate::domain::entities::{Board, Component};
    use crate::domain::repositories::{MockCatalogLookup, MockOrderRepository};
    use chrono::{TimeZone, Utc};

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 12, 21, 14, 30, 5).unwrap()))
    }

    fn order_date() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2025-12-20T09:00:00+01:00").unwrap()
    }

    fn order() -> Order {
        Order::new("Order-1", "Test order", order_date()).unwrap()
    }

    fn service(repo: MockOrderRepository, catalog: MockCatalogLookup) -> OrderService<MockOrderRepository, MockCatalogLookup> {
        OrderService::new(Arc::new(repo), Arc::new(catalog), clock())
    }

    fn apply_to(
        order: Order,
    ) -> impl FnMut(Uuid, OrderChange) -> Result<Option<Order>, AppError> + Send + 'static {
        move |_, change| {
            let mut stored = order.clone();
            change(&mut stored)?;
            Ok(Some(stored))
        }
    }

    #[tokio::test]
    async fn test_create_order_keeps_date() {
        let mut mock_repo = MockOrderRepository::new();
        mock_repo.expect_insert().times(1).returning(|_| Ok(()));

        let created = service(mock_repo, MockCatalogLookup::new())
            .create(OrderInput {
                name: "Order-1".to_string(),
                description: String::new(),
                order_date: order_date(),
            })
            .await
            .unwrap();

        assert_eq!(created.order_date(), order_date());
    }

    #[tokio::test]
    async fn test_add_board_checks_catalog() {
        let o = order();
        let order_id = o.id();
        let board_id = Uuid::new_v4();

        let mut mock_repo = MockOrderRepository::new();
        let stored = o.clone();
        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        mock_repo
            .expect_modify()
            .withf(move |id, _| *id == order_id)
            .times(1)
            .returning(apply_to(o));

        let mut catalog = MockCatalogLookup::new();
        catalog.expect_board_exists().times(1).returning(|_| Ok(true));

        let updated = service(mock_repo, catalog)
            .add_board(order_id, board_id)
            .await
            .unwrap();
        assert_eq!(updated.board_ids().collect::<Vec<_>>(), vec![board_id]);
    }

    #[tokio::test]
    async fn test_add_missing_board() {
        let o = order();
        let order_id = o.id();

        let mut mock_repo = MockOrderRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(o.clone())));
        mock_repo.expect_modify().times(0);

        let mut catalog = MockCatalogLookup::new();
        catalog.expect_board_exists().returning(|_| Ok(false));

        let result = service(mock_repo, catalog).add_board(order_id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_add_board_twice_is_conflict() {
        let board_id = Uuid::new_v4();
        let mut o = order();
        o.add_board(board_id).unwrap();
        let order_id = o.id();

        let mut mock_repo = MockOrderRepository::new();
        let stored = o.clone();
        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        mock_repo.expect_modify().times(1).returning(apply_to(o));

        let mut catalog = MockCatalogLookup::new();
        catalog.expect_board_exists().returning(|_| Ok(true));

        let result = service(mock_repo, catalog).add_board(order_id, board_id).await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_add_board_to_missing_order() {
        let mut mock_repo = MockOrderRepository::new();
        mock_repo.expect_find_by_id().returning(|_| Ok(None));
        mock_repo.expect_modify().times(0);

        let mut catalog = MockCatalogLookup::new();
        catalog.expect_board_exists().times(0);

        let result = service(mock_repo, catalog)
            .add_board(Uuid::new_v4(), Uuid::new_v4())
            .await;
        match result {
            Err(AppError::NotFound { message, .. }) => assert_eq!(message, "Order not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remove_board() {
        let board_id = Uuid::new_v4();
        let mut o = order();
        o.add_board(board_id).unwrap();
        let order_id = o.id();

        let mut mock_repo = MockOrderRepository::new();
        mock_repo.expect_modify().times(2).returning(apply_to(o));
        let service = service(mock_repo, MockCatalogLookup::new());

        let updated = service.remove_board(order_id, board_id).await.unwrap();
        assert!(!updated.contains_board(board_id));

        let result = service.remove_board(order_id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_missing_order() {
        let mut mock_repo = MockOrderRepository::new();
        mock_repo.expect_modify().times(1).returning(|_, _| Ok(None));

        let result = service(mock_repo, MockCatalogLookup::new())
            .update(
                Uuid::new_v4(),
                OrderInput {
                    name: "Order-2".to_string(),
                    description: String::new(),
                    order_date: order_date(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_snapshot_of_missing_order() {
        let mut mock_repo = MockOrderRepository::new();
        mock_repo.expect_load_graph().returning(|_| Ok(None));

        let result = service(mock_repo, MockCatalogLookup::new())
            .snapshot(Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_download_payload() {
        let r = Component::new("R_10K", "Resistor 10k", 100).unwrap();
        let mut board = Board::new("Board-A", "", 100.0, 50.0).unwrap();
        board.add_component(r.id(), 2).unwrap();
        let mut o = order();
        o.add_board(board.id()).unwrap();
        let order_id = o.id();
        let graph = OrderGraph::new(o, vec![board], vec![r]);

        let mut mock_repo = MockOrderRepository::new();
        mock_repo
            .expect_load_graph()
            .withf(move |id| *id == order_id)
            .returning(move |_| Ok(Some(graph.clone())));

        let payload = service(mock_repo, MockCatalogLookup::new())
            .download(order_id)
            .await
            .unwrap();

        assert_eq!(payload.content_type, "application/json");
        assert_eq!(
            payload.file_name,
            format!("order_{order_id}_20251221_143005_utc.json")
        );

        let parsed: ProductionSnapshot = serde_json::from_slice(&payload.content).unwrap();
        assert_eq!(parsed.bom.len(), 1);
        assert_eq!(parsed.bom[0].total_quantity, 2);
        assert_eq!(parsed.order.order_date, order_date());
        assert!(String::from_utf8(payload.content).unwrap().contains('\n'));
    }
}
