//! Cascade policy for root deletions.
//!
//! Deleting a root never leaves a link row pointing at it:
//!
//! | Deleted     | Placements removed        | Order links removed      |
//! |-------------|---------------------------|--------------------------|
//! | Component   | every row for that part   | none                     |
//! | Board       | every row of that board   | every row for that board |
//! | Order       | none                      | every row of that order  |
//!
//! Storage backends run the policy as two explicit phases inside their own
//! atomic boundary: [`CascadePlan::collect`] (or the `with_*` builders, when
//! keys come from a query) gathers the affected link keys, then the plan is
//! applied together with the removal of the root. Boards and components are
//! never deleted as a consequence of another deletion.

use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::entities::{Board, Component, Order};

/// The root entity being deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionTarget {
    Component(Uuid),
    Board(Uuid),
    Order(Uuid),
}

impl DeletionTarget {
    pub fn id(&self) -> Uuid {
        match *self {
            Self::Component(id) | Self::Board(id) | Self::Order(id) => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Component(_) => Component::KIND,
            Self::Board(_) => Board::KIND,
            Self::Order(_) => Order::KIND,
        }
    }

    /// Whether board placements reference this kind of root.
    pub fn cascades_to_placements(&self) -> bool {
        matches!(self, Self::Component(_) | Self::Board(_))
    }

    /// Whether order links reference this kind of root.
    pub fn cascades_to_order_links(&self) -> bool {
        matches!(self, Self::Board(_) | Self::Order(_))
    }
}

/// Key of a board placement row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacementKey {
    pub board_id: Uuid,
    pub component_id: Uuid,
}

/// Key of an order membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderLinkKey {
    pub order_id: Uuid,
    pub board_id: Uuid,
}

/// The link rows that must disappear together with a deleted root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePlan {
    target: DeletionTarget,
    placements: Vec<PlacementKey>,
    order_links: Vec<OrderLinkKey>,
}

impl CascadePlan {
    /// An empty plan for `target`.
    pub fn new(target: DeletionTarget) -> Self {
        Self {
            target,
            placements: Vec::new(),
            order_links: Vec::new(),
        }
    }

    /// Phase one over an in-memory graph: collects every link row that
    /// references `target`.
    pub fn collect<'a>(
        target: DeletionTarget,
        boards: impl IntoIterator<Item = &'a Board>,
        orders: impl IntoIterator<Item = &'a Order>,
    ) -> Self {
        let mut plan = Self::new(target);

        if target.cascades_to_placements() {
            let placements = boards
                .into_iter()
                .flat_map(|board| board.component_links())
                .filter(|link| match target {
                    DeletionTarget::Component(id) => link.component_id() == id,
                    DeletionTarget::Board(id) => link.board_id() == id,
                    DeletionTarget::Order(_) => false,
                })
                .map(|link| PlacementKey {
                    board_id: link.board_id(),
                    component_id: link.component_id(),
                });
            plan.placements.extend(placements);
        }

        if target.cascades_to_order_links() {
            let order_links = orders
                .into_iter()
                .flat_map(|order| order.board_links())
                .filter(|link| match target {
                    DeletionTarget::Board(id) => link.board_id() == id,
                    DeletionTarget::Order(id) => link.order_id() == id,
                    DeletionTarget::Component(_) => false,
                })
                .map(|link| OrderLinkKey {
                    order_id: link.order_id(),
                    board_id: link.board_id(),
                });
            plan.order_links.extend(order_links);
        }

        plan
    }

    /// Adds placement keys selected by a storage query. Keys that do not
    /// reference the target are ignored.
    pub fn with_placements(mut self, keys: impl IntoIterator<Item = PlacementKey>) -> Self {
        let target = self.target;
        self.placements.extend(keys.into_iter().filter(|key| match target {
            DeletionTarget::Component(id) => key.component_id == id,
            DeletionTarget::Board(id) => key.board_id == id,
            DeletionTarget::Order(_) => false,
        }));
        self
    }

    /// Adds order link keys selected by a storage query. Keys that do not
    /// reference the target are ignored.
    pub fn with_order_links(mut self, keys: impl IntoIterator<Item = OrderLinkKey>) -> Self {
        let target = self.target;
        self.order_links.extend(keys.into_iter().filter(|key| match target {
            DeletionTarget::Board(id) => key.board_id == id,
            DeletionTarget::Order(id) => key.order_id == id,
            DeletionTarget::Component(_) => false,
        }));
        self
    }

    /// Phase two on one board: drops the placements this plan lists for it.
    ///
    /// Returns the number of links removed.
    pub fn apply_to_board(&self, board: &mut Board) -> usize {
        let board_id = board.id();
        self.placements
            .iter()
            .filter(|key| key.board_id == board_id)
            .filter(|key| board.detach_component(key.component_id))
            .count()
    }

    /// Phase two on one order: drops the board links this plan lists for it.
    ///
    /// Returns the number of links removed.
    pub fn apply_to_order(&self, order: &mut Order) -> usize {
        let order_id = order.id();
        self.order_links
            .iter()
            .filter(|key| key.order_id == order_id)
            .filter(|key| order.detach_board(key.board_id))
            .count()
    }

    /// Boards whose placements this plan touches, excluding a deleted board itself.
    pub fn affected_boards(&self) -> impl Iterator<Item = Uuid> + '_ {
        let deleted = match self.target {
            DeletionTarget::Board(id) => Some(id),
            _ => None,
        };
        let mut seen = HashSet::new();
        self.placements
            .iter()
            .map(|key| key.board_id)
            .filter(move |id| Some(*id) != deleted && seen.insert(*id))
    }

    /// Orders whose board links this plan touches, excluding a deleted order itself.
    pub fn affected_orders(&self) -> impl Iterator<Item = Uuid> + '_ {
        let deleted = match self.target {
            DeletionTarget::Order(id) => Some(id),
            _ => None,
        };
        let mut seen = HashSet::new();
        self.order_links
            .iter()
            .map(|key| key.order_id)
            .filter(move |id| Some(*id) != deleted && seen.insert(*id))
    }

    pub fn target(&self) -> DeletionTarget {
        self.target
    }

    pub fn placements(&self) -> &[PlacementKey] {
        &self.placements
    }

    pub fn order_links(&self) -> &[OrderLinkKey] {
        &self.order_links
    }

    /// Total number of link rows this plan removes.
    pub fn link_count(&self) -> usize {
        self.placements.len() + self.order_links.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    struct Graph {
        x: Component,
        y: Component,
        b1: Board,
        b2: Board,
        o1: Order,
        o2: Order,
    }

    fn graph() -> Graph {
        let x = Component::new("X", "", 10).unwrap();
        let y = Component::new("Y", "", 10).unwrap();

        let mut b1 = Board::new("B1", "", 10.0, 10.0).unwrap();
        b1.add_component(x.id(), 2).unwrap();
        b1.add_component(y.id(), 1).unwrap();

        let mut b2 = Board::new("B2", "", 10.0, 10.0).unwrap();
        b2.add_component(y.id(), 4).unwrap();

        let date = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z").unwrap();
        let mut o1 = Order::new("O1", "", date).unwrap();
        o1.add_board(b1.id()).unwrap();
        o1.add_board(b2.id()).unwrap();
        let mut o2 = Order::new("O2", "", date).unwrap();
        o2.add_board(b1.id()).unwrap();

        Graph { x, y, b1, b2, o1, o2 }
    }

    #[test]
    fn test_target_rules() {
        let id = Uuid::new_v4();
        assert!(DeletionTarget::Component(id).cascades_to_placements());
        assert!(!DeletionTarget::Component(id).cascades_to_order_links());
        assert!(DeletionTarget::Board(id).cascades_to_placements());
        assert!(DeletionTarget::Board(id).cascades_to_order_links());
        assert!(!DeletionTarget::Order(id).cascades_to_placements());
        assert!(DeletionTarget::Order(id).cascades_to_order_links());
        assert_eq!(DeletionTarget::Board(id).kind(), "board");
        assert_eq!(DeletionTarget::Order(id).id(), id);
    }

    #[test]
    fn test_component_deletion_collects_placements_across_boards() {
        let g = graph();
        let plan = CascadePlan::collect(
            DeletionTarget::Component(g.y.id()),
            [&g.b1, &g.b2],
            [&g.o1, &g.o2],
        );

        assert_eq!(plan.placements().len(), 2);
        assert!(plan.order_links().is_empty());
        assert!(plan.placements().iter().all(|k| k.component_id == g.y.id()));
        assert_eq!(plan.affected_boards().count(), 2);
    }

    #[test]
    fn test_board_deletion_collects_both_link_kinds() {
        let g = graph();
        let plan = CascadePlan::collect(
            DeletionTarget::Board(g.b1.id()),
            [&g.b1, &g.b2],
            [&g.o1, &g.o2],
        );

        assert_eq!(plan.placements().len(), 2);
        assert_eq!(plan.order_links().len(), 2);
        assert_eq!(plan.link_count(), 4);
        assert_eq!(plan.affected_boards().count(), 0);
        let orders: Vec<Uuid> = plan.affected_orders().collect();
        assert_eq!(orders, vec![g.o1.id(), g.o2.id()]);
    }

    #[test]
    fn test_order_deletion_leaves_boards_alone() {
        let g = graph();
        let plan = CascadePlan::collect(
            DeletionTarget::Order(g.o1.id()),
            [&g.b1, &g.b2],
            [&g.o1, &g.o2],
        );

        assert!(plan.placements().is_empty());
        assert_eq!(plan.order_links().len(), 2);
        assert_eq!(plan.affected_orders().count(), 0);
    }

    #[test]
    fn test_apply_removes_only_listed_links() {
        let mut g = graph();
        let plan = CascadePlan::collect(
            DeletionTarget::Component(g.y.id()),
            [&g.b1, &g.b2],
            [&g.o1, &g.o2],
        );

        assert_eq!(plan.apply_to_board(&mut g.b1), 1);
        assert_eq!(plan.apply_to_board(&mut g.b2), 1);

        assert_eq!(g.b1.component_links().len(), 1);
        assert_eq!(g.b1.component_links()[0].component_id(), g.x.id());
        assert!(g.b2.component_links().is_empty());
        assert_eq!(plan.apply_to_board(&mut g.b1), 0);
    }

    #[test]
    fn test_apply_board_deletion_to_orders() {
        let mut g = graph();
        let plan = CascadePlan::collect(
            DeletionTarget::Board(g.b1.id()),
            [&g.b1, &g.b2],
            [&g.o1, &g.o2],
        );

        assert_eq!(plan.apply_to_order(&mut g.o1), 1);
        assert_eq!(plan.apply_to_order(&mut g.o2), 1);
        assert_eq!(g.o1.board_ids().collect::<Vec<_>>(), vec![g.b2.id()]);
        assert!(g.o2.board_links().is_empty());
    }

    #[test]
    fn test_builders_filter_foreign_keys() {
        let target_id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let plan = CascadePlan::new(DeletionTarget::Component(target_id))
            .with_placements([
                PlacementKey {
                    board_id: other,
                    component_id: target_id,
                },
                PlacementKey {
                    board_id: other,
                    component_id: other,
                },
            ])
            .with_order_links([OrderLinkKey {
                order_id: other,
                board_id: other,
            }]);

        assert_eq!(plan.placements().len(), 1);
        assert!(plan.order_links().is_empty());
    }
}
