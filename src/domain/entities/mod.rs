//! Core domain entities.
//!
//! Three roots ([`Component`], [`Board`], [`Order`]) and two link entities
//! ([`BoardComponent`], [`OrderBoard`]) keyed by the pair of ids they join.
//! Links are plain records owned by one root; no entity holds a reference to
//! another entity, so the graph has no ownership cycles.
//!
//! Every constructor and `update` method validates through
//! [`crate::domain::guard`]; fields are private so the invariants cannot be
//! bypassed after construction.

pub mod board;
pub mod component;
pub mod order;

pub use board::{Board, BoardComponent};
pub use component::Component;
pub use order::{Order, OrderBoard};
