//! Order entity and its board links.

use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::domain::entities::Board;
use crate::domain::error::DomainError;
use crate::domain::guard;

/// Membership of one board in one order. Carries no attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBoard {
    order_id: Uuid,
    board_id: Uuid,
}

impl OrderBoard {
    pub fn order_id(&self) -> Uuid {
        self.order_id
    }

    pub fn board_id(&self) -> Uuid {
        self.board_id
    }
}

/// A production order aggregating boards.
///
/// `order_date` is supplied by the caller, offset included; the entity never
/// defaults it.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: Uuid,
    name: String,
    description: String,
    order_date: DateTime<FixedOffset>,
    board_links: Vec<OrderBoard>,
}

impl Order {
    pub const KIND: &'static str = "order";

    /// Creates an order with a fresh identity and no boards.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] if the name is blank or too long or
    /// the description is too long.
    pub fn new(
        name: &str,
        description: &str,
        order_date: DateTime<FixedOffset>,
    ) -> Result<Self, DomainError> {
        Self::with_id(Uuid::new_v4(), name, description, order_date)
    }

    pub fn with_id(
        id: Uuid,
        name: &str,
        description: &str,
        order_date: DateTime<FixedOffset>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            name: guard::name(name, "name")?,
            description: guard::description(description, "description")?,
            order_date,
            board_links: Vec::new(),
        })
    }

    /// Rebuilds an order from stored fields and linked board ids, in stored order.
    pub fn restore(
        id: Uuid,
        name: &str,
        description: &str,
        order_date: DateTime<FixedOffset>,
        board_ids: impl IntoIterator<Item = Uuid>,
    ) -> Result<Self, DomainError> {
        let mut order = Self::with_id(id, name, description, order_date)?;
        for board_id in board_ids {
            order.add_board(board_id)?;
        }
        Ok(order)
    }

    /// Replaces name, description and order date. Board links are untouched.
    pub fn update(
        &mut self,
        name: &str,
        description: &str,
        order_date: DateTime<FixedOffset>,
    ) -> Result<(), DomainError> {
        let name = guard::name(name, "name")?;
        let description = guard::description(description, "description")?;

        self.name = name;
        self.description = description;
        self.order_date = order_date;
        Ok(())
    }

    /// Links a board to this order.
    ///
    /// Existence of the board is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DuplicateLink`] if the board is already linked.
    pub fn add_board(&mut self, board_id: Uuid) -> Result<(), DomainError> {
        if self.contains_board(board_id) {
            return Err(DomainError::DuplicateLink {
                owner: Self::KIND,
                owner_id: self.id,
                child: Board::KIND,
                child_id: board_id,
            });
        }

        self.board_links.push(OrderBoard {
            order_id: self.id,
            board_id,
        });
        Ok(())
    }

    /// Unlinks a board from this order. The board itself is not affected.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::LinkNotFound`] if the board is not linked.
    pub fn remove_board(&mut self, board_id: Uuid) -> Result<(), DomainError> {
        let index = self
            .board_links
            .iter()
            .position(|link| link.board_id == board_id)
            .ok_or(DomainError::LinkNotFound {
                owner: Self::KIND,
                owner_id: self.id,
                child: Board::KIND,
                child_id: board_id,
            })?;

        self.board_links.remove(index);
        Ok(())
    }

    /// Drops the link to a deleted board, if any. Cascade path only.
    pub(crate) fn detach_board(&mut self, board_id: Uuid) -> bool {
        let before = self.board_links.len();
        self.board_links.retain(|link| link.board_id != board_id);
        self.board_links.len() != before
    }

    pub fn contains_board(&self, board_id: Uuid) -> bool {
        self.board_links.iter().any(|link| link.board_id == board_id)
    }

    pub fn board_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.board_links.iter().map(OrderBoard::board_id)
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

    pub fn order_date(&self) -> DateTime<FixedOffset> {
        self.order_date
    }

    pub fn board_links(&self) -> &[OrderBoard] {
        &self.board_links
    }
}
