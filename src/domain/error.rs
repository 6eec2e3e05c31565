//! Failure kinds raised by the domain layer.

use thiserror::Error;
use uuid::Uuid;

/// Errors produced by entity constructors, link mutations and aggregation.
///
/// All variants are permanent for the same input: retrying without changing
/// the request yields the same outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// A field failed a guard check.
    #[error("{field} {reason}")]
    Validation { field: &'static str, reason: String },

    /// The link already exists on its owner.
    #[error("{child} {child_id} is already linked to {owner} {owner_id}")]
    DuplicateLink {
        owner: &'static str,
        owner_id: Uuid,
        child: &'static str,
        child_id: Uuid,
    },

    /// The link to mutate or remove does not exist on its owner.
    #[error("{child} {child_id} is not linked to {owner} {owner_id}")]
    LinkNotFound {
        owner: &'static str,
        owner_id: Uuid,
        child: &'static str,
        child_id: Uuid,
    },

    /// A root entity required by the operation does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },
}

impl DomainError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}
