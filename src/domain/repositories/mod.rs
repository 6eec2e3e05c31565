//! Repository trait definitions for the domain layer.
//!
//! These traits abstract storage of the three roots. Implementations live in
//! `crate::infrastructure::persistence`; mocks are generated via `mockall`.
//!
//! # Available Repositories
//!
//! - [`ComponentRepository`] - component catalog
//! - [`BoardRepository`] - boards with placements
//! - [`OrderRepository`] - orders with board links, graph reads for the BOM
//! - [`CatalogLookup`] - existence checks used before linking

pub mod board_repository;
pub mod catalog;
pub mod component_repository;
pub mod order_repository;

pub use board_repository::{BoardChange, BoardRepository};
pub use catalog::CatalogLookup;
pub use component_repository::ComponentRepository;
pub use order_repository::{OrderChange, OrderRepository};

#[cfg(test)]
pub use board_repository::MockBoardRepository;
#[cfg(test)]
pub use catalog::MockCatalogLookup;
#[cfg(test)]
pub use component_repository::MockComponentRepository;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
