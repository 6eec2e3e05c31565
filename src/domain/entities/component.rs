//! Component entity: a catalog part that can be placed on boards.

use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::guard;

/// A catalog component.
///
/// `quantity` is the nominal stock/default quantity of the part. It is
/// independent of how many are placed on any board (see
/// [`crate::domain::entities::BoardComponent`]) and is never reconciled with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    id: Uuid,
    name: String,
    description: String,
    quantity: i32,
}

impl Component {
    pub const KIND: &'static str = "component";

    /// Creates a component with a fresh identity.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] if the name is blank or too long,
    /// the description is too long, or `quantity <= 0`.
    pub fn new(name: &str, description: &str, quantity: i32) -> Result<Self, DomainError> {
        Self::with_id(Uuid::new_v4(), name, description, quantity)
    }

    /// Creates a component with a known identity, running the same validation
    /// as [`Component::new`]. Used when rehydrating from storage.
    pub fn with_id(
        id: Uuid,
        name: &str,
        description: &str,
        quantity: i32,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            name: guard::name(name, "name")?,
            description: guard::description(description, "description")?,
            quantity: guard::require_positive(quantity, "quantity")?,
        })
    }

    /// Replaces every field after revalidating all of them.
    ///
    /// The component is left untouched when any field fails.
    pub fn update(&mut self, name: &str, description: &str, quantity: i32) -> Result<(), DomainError> {
        let name = guard::name(name, "name")?;
        let description = guard::description(description, "description")?;
        let quantity = guard::require_positive(quantity, "quantity")?;

        self.name = name;
        self.description = description;
        self.quantity = quantity;
        Ok(())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }
}
