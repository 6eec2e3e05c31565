//! Business logic services for the application layer.

pub mod auth_service;
pub mod board_service;
pub mod component_service;
pub mod order_service;

pub use auth_service::AuthService;
pub use board_service::{BoardInput, BoardService};
pub use component_service::{ComponentInput, ComponentService};
pub use order_service::{DownloadPayload, OrderInput, OrderService};
