//! API route configuration.
//!
//! Mounted under `/api`. Guarded by [`crate::api::middleware::auth`] when
//! token hashes are configured.

use crate::api::handlers::{
    add_order_board_handler, add_placement_handler, create_board_handler,
    create_component_handler, create_order_handler, delete_board_handler,
    delete_component_handler, delete_order_handler, download_order_handler, get_board_handler,
    get_component_handler, get_order_handler, list_boards_handler, list_components_handler,
    list_orders_handler, remove_order_board_handler, remove_placement_handler,
    update_board_handler, update_component_handler, update_order_handler,
    update_placement_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// All API routes.
///
/// # Endpoints
///
/// - `GET|POST       /components`
/// - `GET|PUT|DELETE /components/{id}`
/// - `GET|POST       /boards`
/// - `GET|PUT|DELETE /boards/{id}`
/// - `POST           /boards/{id}/components`                 - Place a component
/// - `PUT|DELETE     /boards/{id}/components/{component_id}`  - Change or remove a placement
/// - `GET|POST       /orders`
/// - `GET|PUT|DELETE /orders/{id}`
/// - `POST|DELETE    /orders/{id}/boards/{board_id}`          - Link or unlink a board
/// - `GET            /orders/{id}/download`                   - Production snapshot as JSON file
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/components",
            get(list_components_handler).post(create_component_handler),
        )
        .route(
            "/components/{id}",
            get(get_component_handler)
                .put(update_component_handler)
                .delete(delete_component_handler),
        )
        .route("/boards", get(list_boards_handler).post(create_board_handler))
        .route(
            "/boards/{id}",
            get(get_board_handler)
                .put(update_board_handler)
                .delete(delete_board_handler),
        )
        .route("/boards/{id}/components", post(add_placement_handler))
        .route(
            "/boards/{id}/components/{component_id}",
            put(update_placement_handler).delete(remove_placement_handler),
        )
        .route("/orders", get(list_orders_handler).post(create_order_handler))
        .route(
            "/orders/{id}",
            get(get_order_handler)
                .put(update_order_handler)
                .delete(delete_order_handler),
        )
        .route(
            "/orders/{id}/boards/{board_id}",
            post(add_order_board_handler).delete(remove_order_board_handler),
        )
        .route("/orders/{id}/download", get(download_order_handler))
}
