//! Board entity and its component placements.

use uuid::Uuid;

use crate::domain::entities::Component;
use crate::domain::error::DomainError;
use crate::domain::guard;

/// A placement of one component on one board.
///
/// Identity is the `(board_id, component_id)` pair; a board never holds two
/// links for the same component.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardComponent {
    board_id: Uuid,
    component_id: Uuid,
    placement_quantity: i32,
}

impl BoardComponent {
    fn new(board_id: Uuid, component_id: Uuid, placement_quantity: i32) -> Result<Self, DomainError> {
        Ok(Self {
            board_id,
            component_id,
            placement_quantity: guard::require_positive(placement_quantity, "placement_quantity")?,
        })
    }

    pub fn board_id(&self) -> Uuid {
        self.board_id
    }

    pub fn component_id(&self) -> Uuid {
        self.component_id
    }

    pub fn placement_quantity(&self) -> i32 {
        self.placement_quantity
    }
}

/// A printed circuit board design.
///
/// The board owns its component links: they are created, re-quantified and
/// removed only through the methods below. The board does not know whether a
/// component id refers to an existing catalog entry; that check belongs to
/// the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    id: Uuid,
    name: String,
    description: String,
    length: f64,
    width: f64,
    component_links: Vec<BoardComponent>,
}

impl Board {
    pub const KIND: &'static str = "board";

    /// Creates a board with a fresh identity and no placements.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] if the name is blank or too long,
    /// the description is too long, or either dimension is not `> 0`.
    pub fn new(name: &str, description: &str, length: f64, width: f64) -> Result<Self, DomainError> {
        Self::with_id(Uuid::new_v4(), name, description, length, width)
    }

    /// Creates a board with a known identity and no placements.
    pub fn with_id(
        id: Uuid,
        name: &str,
        description: &str,
        length: f64,
        width: f64,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            name: guard::name(name, "name")?,
            description: guard::description(description, "description")?,
            length: guard::require_positive(length, "length")?,
            width: guard::require_positive(width, "width")?,
            component_links: Vec::new(),
        })
    }

    /// Rebuilds a board from stored fields and `(component_id, quantity)`
    /// placements, in stored order, re-running every link invariant.
    pub fn restore(
        id: Uuid,
        name: &str,
        description: &str,
        length: f64,
        width: f64,
        placements: impl IntoIterator<Item = (Uuid, i32)>,
    ) -> Result<Self, DomainError> {
        let mut board = Self::with_id(id, name, description, length, width)?;
        for (component_id, quantity) in placements {
            board.add_component(component_id, quantity)?;
        }
        Ok(board)
    }

    /// Replaces name, description and dimensions. Placements are untouched.
    ///
    /// The board is left unchanged when any field fails validation.
    pub fn update(
        &mut self,
        name: &str,
        description: &str,
        length: f64,
        width: f64,
    ) -> Result<(), DomainError> {
        let name = guard::name(name, "name")?;
        let description = guard::description(description, "description")?;
        let length = guard::require_positive(length, "length")?;
        let width = guard::require_positive(width, "width")?;

        self.name = name;
        self.description = description;
        self.length = length;
        self.width = width;
        Ok(())
    }

    /// Places `placement_quantity` units of a component on this board.
    ///
    /// # Errors
    ///
    /// - [`DomainError::DuplicateLink`] if the component is already placed
    /// - [`DomainError::Validation`] if `placement_quantity <= 0`
    pub fn add_component(&mut self, component_id: Uuid, placement_quantity: i32) -> Result<(), DomainError> {
        if self.placement(component_id).is_some() {
            return Err(DomainError::DuplicateLink {
                owner: Self::KIND,
                owner_id: self.id,
                child: Component::KIND,
                child_id: component_id,
            });
        }

        let link = BoardComponent::new(self.id, component_id, placement_quantity)?;
        self.component_links.push(link);
        Ok(())
    }

    /// Removes the placement of a component.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::LinkNotFound`] if the component is not placed.
    pub fn remove_component(&mut self, component_id: Uuid) -> Result<(), DomainError> {
        let index = self
            .component_links
            .iter()
            .position(|link| link.component_id == component_id)
            .ok_or_else(|| self.link_not_found(component_id))?;

        self.component_links.remove(index);
        Ok(())
    }

    /// Changes the quantity of an existing placement in place, keeping its
    /// position among the board's links.
    ///
    /// # Errors
    ///
    /// - [`DomainError::LinkNotFound`] if the component is not placed
    /// - [`DomainError::Validation`] if `placement_quantity <= 0`
    pub fn update_component_quantity(
        &mut self,
        component_id: Uuid,
        placement_quantity: i32,
    ) -> Result<(), DomainError> {
        let not_found = self.link_not_found(component_id);
        let link = self
            .component_links
            .iter_mut()
            .find(|link| link.component_id == component_id)
            .ok_or(not_found)?;

        link.placement_quantity = guard::require_positive(placement_quantity, "placement_quantity")?;
        Ok(())
    }

    /// Drops the placement of a deleted component, if any. Cascade path only.
    pub(crate) fn detach_component(&mut self, component_id: Uuid) -> bool {
        let before = self.component_links.len();
        self.component_links.retain(|link| link.component_id != component_id);
        self.component_links.len() != before
    }

    pub fn placement(&self, component_id: Uuid) -> Option<&BoardComponent> {
        self.component_links
            .iter()
            .find(|link| link.component_id == component_id)
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

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn component_links(&self) -> &[BoardComponent] {
        &self.component_links
    }

    fn link_not_found(&self, component_id: Uuid) -> DomainError {
        DomainError::LinkNotFound {
            owner: Self::KIND,
            owner_id: self.id,
            child: Component::KIND,
            child_id: component_id,
        }
    }
}
