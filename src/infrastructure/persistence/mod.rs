//! Repository implementations.
//!
//! # Backends
//!
//! - [`MemoryStore`] - in-process tables behind one lock, used when no
//!   database is configured and by the HTTP tests
//! - [`PgComponentRepository`], [`PgBoardRepository`], [`PgOrderRepository`],
//!   [`PgCatalog`] - PostgreSQL via SQLx runtime queries

pub mod memory_store;
pub mod pg_board_repository;
pub mod pg_catalog;
pub mod pg_component_repository;
pub mod pg_order_repository;
mod pg_rows;

pub use memory_store::MemoryStore;
pub use pg_board_repository::PgBoardRepository;
pub use pg_catalog::PgCatalog;
pub use pg_component_repository::PgComponentRepository;
pub use pg_order_repository::PgOrderRepository;
