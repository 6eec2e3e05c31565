use std::sync::Arc;

use crate::application::clock::Clock;
use crate::application::services::{AuthService, BoardService, ComponentService, OrderService};
use crate::domain::repositories::{BoardRepository, CatalogLookup, ComponentRepository, OrderRepository};
use crate::infrastructure::storage::Storage;

pub type DynComponentService = ComponentService<dyn ComponentRepository>;
pub type DynBoardService = BoardService<dyn BoardRepository, dyn CatalogLookup>;
pub type DynOrderService = OrderService<dyn OrderRepository, dyn CatalogLookup>;

/// Shared handler state. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub component_service: Arc<DynComponentService>,
    pub board_service: Arc<DynBoardService>,
    pub order_service: Arc<DynOrderService>,
    pub auth_service: Arc<AuthService>,
    pub storage: Storage,
}

impl AppState {
    pub fn new(storage: Storage, clock: Arc<dyn Clock>, auth_service: AuthService) -> Self {
        let component_service = Arc::new(ComponentService::new(storage.components.clone()));
        let board_service = Arc::new(BoardService::new(
            storage.boards.clone(),
            storage.catalog.clone(),
        ));
        let order_service = Arc::new(OrderService::new(
            storage.orders.clone(),
            storage.catalog.clone(),
            clock,
        ));

        Self {
            component_service,
            board_service,
            order_service,
            auth_service: Arc::new(auth_service),
            storage,
        }
    }
}
