//! Interleaved link mutations on one board or one order.
//!
//! The catalog below yields to the scheduler on every existence check, so two
//! mutations joined on the same task both pass their checks before either
//! one writes. Both links must still be stored.

mod common;

use async_trait::async_trait;
use chrono::DateTime;
use smt_order_manager::application::services::{BoardService, OrderService};
use smt_order_manager::domain::entities::{Board, Component, Order};
use smt_order_manager::domain::repositories::{
    BoardRepository, CatalogLookup, ComponentRepository, OrderRepository,
};
use smt_order_manager::error::AppError;
use smt_order_manager::infrastructure::persistence::MemoryStore;
use std::sync::Arc;
use uuid::Uuid;

struct YieldingCatalog(MemoryStore);

#[async_trait]
impl CatalogLookup for YieldingCatalog {
    async fn component_exists(&self, id: Uuid) -> Result<bool, AppError> {
        tokio::task::yield_now().await;
        self.0.component_exists(id).await
    }

    async fn board_exists(&self, id: Uuid) -> Result<bool, AppError> {
        tokio::task::yield_now().await;
        self.0.board_exists(id).await
    }
}

async fn component(store: &MemoryStore, name: &str) -> Component {
    let c = Component::new(name, "", 100).unwrap();
    ComponentRepository::insert(store, &c).await.unwrap();
    c
}

async fn board(store: &MemoryStore, name: &str) -> Board {
    let b = Board::new(name, "", 100.0, 50.0).unwrap();
    BoardRepository::insert(store, &b).await.unwrap();
    b
}

#[tokio::test]
async fn test_interleaved_placements_on_one_board_both_land() {
    let store = MemoryStore::new();
    let r10k = component(&store, "R_10K").await;
    let c100n = component(&store, "C_100n").await;
    let target = board(&store, "Board-A").await;

    let service = BoardService::new(
        Arc::new(store.clone()),
        Arc::new(YieldingCatalog(store.clone())),
    );

    let (first, second) = tokio::join!(
        service.add_component(target.id(), r10k.id(), 2),
        service.add_component(target.id(), c100n.id(), 5),
    );
    first.unwrap();
    second.unwrap();

    let stored = BoardRepository::find_by_id(&store, target.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.component_links().len(), 2);
    assert_eq!(stored.placement(r10k.id()).unwrap().placement_quantity(), 2);
    assert_eq!(stored.placement(c100n.id()).unwrap().placement_quantity(), 5);
}

#[tokio::test]
async fn test_interleaved_placement_of_same_component_conflicts_once() {
    let store = MemoryStore::new();
    let r10k = component(&store, "R_10K").await;
    let target = board(&store, "Board-A").await;

    let service = BoardService::new(
        Arc::new(store.clone()),
        Arc::new(YieldingCatalog(store.clone())),
    );

    let (first, second) = tokio::join!(
        service.add_component(target.id(), r10k.id(), 2),
        service.add_component(target.id(), r10k.id(), 3),
    );
    let (winner, loser) = match (first, second) {
        (Ok(_), Err(e)) => (2, e),
        (Err(e), Ok(_)) => (3, e),
        other => panic!("expected exactly one success, got {other:?}"),
    };
    assert!(matches!(loser, AppError::Conflict { .. }));

    let stored = BoardRepository::find_by_id(&store, target.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.component_links().len(), 1);
    assert_eq!(stored.placement(r10k.id()).unwrap().placement_quantity(), winner);
}

#[tokio::test]
async fn test_interleaved_board_links_on_one_order_both_land() {
    let store = MemoryStore::new();
    let b1 = board(&store, "Board-A").await;
    let b2 = board(&store, "Board-B").await;
    let order = Order::new(
        "Order-001",
        "",
        DateTime::parse_from_rfc3339("2025-12-20T09:00:00+01:00").unwrap(),
    )
    .unwrap();
    OrderRepository::insert(&store, &order).await.unwrap();

    let service = OrderService::new(
        Arc::new(store.clone()),
        Arc::new(YieldingCatalog(store.clone())),
        Arc::new(common::fixed_clock()),
    );

    let (first, second) = tokio::join!(
        service.add_board(order.id(), b1.id()),
        service.add_board(order.id(), b2.id()),
    );
    first.unwrap();
    second.unwrap();

    let stored = OrderRepository::find_by_id(&store, order.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.board_ids().count(), 2);
    assert!(stored.contains_board(b1.id()));
    assert!(stored.contains_board(b2.id()));
}
