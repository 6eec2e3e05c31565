//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Entity invariants are enforced again by the domain.

pub mod boards;
pub mod components;
pub mod health;
pub mod orders;
pub mod pagination;
