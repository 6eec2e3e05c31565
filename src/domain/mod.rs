//! Domain layer: entities, link rules, cascade policy and BOM aggregation.
//!
//! Everything here is synchronous and storage-agnostic except the repository
//! traits, which define the contracts the infrastructure layer fulfils.
//!
//! # Architecture
//!
//! - [`guard`] - field validation shared by every entity
//! - [`entities`] - roots ([`entities::Component`], [`entities::Board`],
//!   [`entities::Order`]) and their link records
//! - [`cascade`] - which links disappear when a root is deleted
//! - [`bom`] - order graph to production snapshot
//! - [`paging`] - list windows and name filters
//! - [`repositories`] - storage and existence-check traits
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Links are explicit join records keyed by id pairs, owned by one root
//! - Orchestration (existence checks, persistence) lives in
//!   [`crate::application::services`]

pub mod bom;
pub mod cascade;
pub mod entities;
pub mod error;
pub mod guard;
pub mod paging;
pub mod repositories;
