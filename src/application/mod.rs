//! Application layer services orchestrating the domain.
//!
//! Services check that referenced roots exist, hand the entity method to the
//! repository's atomic `modify` and emit the log event and metric for the
//! mutation. Handlers and the admin
//! CLI talk only to this layer.
//!
//! # Available Services
//!
//! - [`services::ComponentService`] - component catalog
//! - [`services::BoardService`] - boards and placements
//! - [`services::OrderService`] - orders, board membership, BOM downloads
//! - [`services::AuthService`] - API token authentication

pub mod clock;
pub mod services;
