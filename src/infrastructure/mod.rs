//! Infrastructure layer for storage and system integrations.
//!
//! This layer implements the interfaces defined by the domain and application
//! layers.
//!
//! # Modules
//!
//! - [`persistence`] - in-memory and PostgreSQL repositories
//! - [`storage`] - backend selection as a bundle of trait objects
//! - [`clock`] - wall-clock [`crate::application::clock::Clock`]
//! - [`seed`] - demo data for a fresh installation

pub mod clock;
pub mod persistence;
pub mod seed;
pub mod storage;
