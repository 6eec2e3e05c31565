//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod boards;
pub mod components;
pub mod health;
pub mod orders;

pub use boards::{
    add_placement_handler, create_board_handler, delete_board_handler, get_board_handler,
    list_boards_handler, remove_placement_handler, update_board_handler, update_placement_handler,
};
pub use components::{
    create_component_handler, delete_component_handler, get_component_handler,
    list_components_handler, update_component_handler,
};
pub use health::health_handler;
pub use orders::{
    add_order_board_handler, create_order_handler, delete_order_handler, download_order_handler,
    get_order_handler, list_orders_handler, remove_order_board_handler, update_order_handler,
};
