//! Bill-of-materials aggregation.
//!
//! Turns a consistent read of one order's graph ([`OrderGraph`]) into an
//! immutable, fully denormalised [`ProductionSnapshot`]: the order summary,
//! each linked board with its placements (in the board's own link order), and
//! the order-level BOM summed per component.
//!
//! Aggregation is pure. The snapshot timestamp is a parameter, so two runs over
//! the same graph differ only in `downloaded_at_utc`.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::domain::entities::{Board, Component, Order};
use crate::domain::error::DomainError;

/// Name reported for a placement whose component is missing from the graph.
pub const UNKNOWN_COMPONENT_NAME: &str = "UNKNOWN";

/// One order together with the boards it links and the components those
/// boards place, read at a single point in time.
#[derive(Debug, Clone)]
pub struct OrderGraph {
    order: Order,
    boards: Vec<Board>,
    components: Vec<Component>,
}

impl OrderGraph {
    pub fn new(order: Order, boards: Vec<Board>, components: Vec<Component>) -> Self {
        Self {
            order,
            boards,
            components,
        }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Distinct component ids placed on the graph's boards, first-seen order.
    pub fn referenced_component_ids(boards: &[Board]) -> Vec<Uuid> {
        let mut seen = HashSet::new();
        boards
            .iter()
            .flat_map(|board| board.component_links())
            .map(|link| link.component_id())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Materialises the production snapshot.
    ///
    /// Boards appear in the order's link order. Linked boards missing from the
    /// graph are skipped; placements whose component is missing are reported
    /// as [`UNKNOWN_COMPONENT_NAME`] with an empty description.
    pub fn snapshot(&self, downloaded_at_utc: DateTime<Utc>) -> ProductionSnapshot {
        let boards_by_id: HashMap<Uuid, &Board> =
            self.boards.iter().map(|board| (board.id(), board)).collect();
        let components_by_id: HashMap<Uuid, &Component> = self
            .components
            .iter()
            .map(|component| (component.id(), component))
            .collect();

        let mut seen = HashSet::new();
        let boards: Vec<BoardSnapshot> = self
            .order
            .board_ids()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| boards_by_id.get(&id))
            .map(|board| BoardSnapshot::resolve(board, &components_by_id))
            .collect();

        let bom = bill_of_materials(&boards);

        ProductionSnapshot {
            downloaded_at_utc,
            order: OrderSummary::from(&self.order),
            boards,
            bom,
        }
    }
}

/// Aggregates the graph of `order_id`.
///
/// # Errors
///
/// Returns [`DomainError::NotFound`] when the order does not exist (`graph` is
/// `None`). Missing boards or components never fail aggregation.
pub fn build_snapshot(
    order_id: Uuid,
    graph: Option<&OrderGraph>,
    downloaded_at_utc: DateTime<Utc>,
) -> Result<ProductionSnapshot, DomainError> {
    graph
        .map(|graph| graph.snapshot(downloaded_at_utc))
        .ok_or_else(|| DomainError::not_found(Order::KIND, order_id))
}

/// Point-in-time export of an order, its boards and its bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionSnapshot {
    pub downloaded_at_utc: DateTime<Utc>,
    pub order: OrderSummary,
    pub boards: Vec<BoardSnapshot>,
    pub bom: Vec<BomLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub order_date: DateTime<FixedOffset>,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            name: order.name().to_string(),
            description: order.description().to_string(),
            order_date: order.order_date(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub length: f64,
    pub width: f64,
    pub placements: Vec<Placement>,
}

impl BoardSnapshot {
    fn resolve(board: &Board, components: &HashMap<Uuid, &Component>) -> Self {
        let placements = board
            .component_links()
            .iter()
            .map(|link| {
                let (component_name, component_description) = components
                    .get(&link.component_id())
                    .map(|c| (c.name().to_string(), c.description().to_string()))
                    .unwrap_or_else(|| (UNKNOWN_COMPONENT_NAME.to_string(), String::new()));

                Placement {
                    component_id: link.component_id(),
                    component_name,
                    component_description,
                    placement_quantity: link.placement_quantity(),
                }
            })
            .collect();

        Self {
            id: board.id(),
            name: board.name().to_string(),
            description: board.description().to_string(),
            length: board.length(),
            width: board.width(),
            placements,
        }
    }
}

/// A component placed on a board, with its name resolved from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub component_id: Uuid,
    pub component_name: String,
    pub component_description: String,
    pub placement_quantity: i32,
}

/// Order-level total for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomLine {
    pub component_id: Uuid,
    pub component_name: String,
    pub total_quantity: i64,
}

/// Groups placements by component id and sums their quantities.
///
/// The name of a line is taken from the first placement seen for that id.
/// Lines are sorted by [`compare_bom_lines`].
pub fn bill_of_materials(boards: &[BoardSnapshot]) -> Vec<BomLine> {
    let mut lines: Vec<BomLine> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for placement in boards.iter().flat_map(|board| &board.placements) {
        let quantity = i64::from(placement.placement_quantity);
        match index.get(&placement.component_id) {
            Some(&i) => lines[i].total_quantity += quantity,
            None => {
                index.insert(placement.component_id, lines.len());
                lines.push(BomLine {
                    component_id: placement.component_id,
                    component_name: placement.component_name.clone(),
                    total_quantity: quantity,
                });
            }
        }
    }

    lines.sort_by(compare_bom_lines);
    lines
}

/// BOM ordering: component name ignoring case, then exact (ordinal) name,
/// then component id, so the output is total and deterministic.
pub fn compare_bom_lines(a: &BomLine, b: &BomLine) -> Ordering {
    a.component_name
        .to_lowercase()
        .cmp(&b.component_name.to_lowercase())
        .then_with(|| a.component_name.cmp(&b.component_name))
        .then_with(|| a.component_id.cmp(&b.component_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 21, hour, 0, 0).unwrap()
    }

    fn order_date() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2025-12-20T09:00:00+01:00").unwrap()
    }

    fn order(name: &str, boards: &[&Board]) -> Order {
        let mut o = Order::new(name, "Test order", order_date()).unwrap();
        for b in boards {
            o.add_board(b.id()).unwrap();
        }
        o
    }

    #[test]
    fn test_single_board_scenario() {
        let r = Component::new("R_10K", "Resistor 10k", 100).unwrap();
        let c = Component::new("C_100n", "Cap 100nF", 200).unwrap();
        let mut board = Board::new("Board-A", "Main PCB", 100.0, 50.0).unwrap();
        board.add_component(r.id(), 2).unwrap();
        board.add_component(c.id(), 1).unwrap();
        let o = order("Order-1", &[&board]);

        let graph = OrderGraph::new(o.clone(), vec![board.clone()], vec![r.clone(), c.clone()]);
        let snapshot = graph.snapshot(at(12));

        assert_eq!(snapshot.downloaded_at_utc, at(12));
        assert_eq!(snapshot.order.name, "Order-1");
        assert_eq!(snapshot.order.order_date, order_date());
        assert_eq!(snapshot.boards.len(), 1);

        let b = &snapshot.boards[0];
        assert_eq!(b.name, "Board-A");
        assert_eq!(b.length, 100.0);
        assert_eq!(b.width, 50.0);
        assert_eq!(b.placements.len(), 2);
        assert_eq!(b.placements[0].component_name, "R_10K");
        assert_eq!(b.placements[0].placement_quantity, 2);
        assert_eq!(b.placements[1].component_name, "C_100n");
        assert_eq!(b.placements[1].component_description, "Cap 100nF");
        assert_eq!(b.placements[1].placement_quantity, 1);

        let bom: Vec<(&str, i64)> = snapshot
            .bom
            .iter()
            .map(|l| (l.component_name.as_str(), l.total_quantity))
            .collect();
        assert_eq!(bom, vec![("C_100n", 1), ("R_10K", 2)]);
    }

    #[test]
    fn test_bom_sums_across_boards() {
        let r = Component::new("R_10K", "", 100).unwrap();
        let mut b1 = Board::new("B1", "", 10.0, 10.0).unwrap();
        b1.add_component(r.id(), 2).unwrap();
        let mut b2 = Board::new("B2", "", 10.0, 10.0).unwrap();
        b2.add_component(r.id(), 3).unwrap();
        let o = order("Order-2", &[&b1, &b2]);

        let snapshot = OrderGraph::new(o, vec![b1, b2], vec![r.clone()]).snapshot(at(1));

        assert_eq!(snapshot.boards.len(), 2);
        assert_eq!(snapshot.bom.len(), 1);
        assert_eq!(snapshot.bom[0].component_id, r.id());
        assert_eq!(snapshot.bom[0].total_quantity, 5);
    }

    #[test]
    fn test_missing_component_is_unknown() {
        let ghost = Uuid::new_v4();
        let mut board = Board::new("Board-A", "", 10.0, 10.0).unwrap();
        board.add_component(ghost, 4).unwrap();
        let o = order("Order-3", &[&board]);

        let snapshot = OrderGraph::new(o, vec![board], Vec::new()).snapshot(at(2));

        let placement = &snapshot.boards[0].placements[0];
        assert_eq!(placement.component_id, ghost);
        assert_eq!(placement.component_name, UNKNOWN_COMPONENT_NAME);
        assert_eq!(placement.component_description, "");
        assert_eq!(snapshot.bom[0].component_name, UNKNOWN_COMPONENT_NAME);
        assert_eq!(snapshot.bom[0].total_quantity, 4);
    }

    #[test]
    fn test_missing_board_is_skipped() {
        let board = Board::new("Board-A", "", 10.0, 10.0).unwrap();
        let o = order("Order-4", &[&board]);

        let snapshot = OrderGraph::new(o, Vec::new(), Vec::new()).snapshot(at(3));

        assert!(snapshot.boards.is_empty());
        assert!(snapshot.bom.is_empty());
    }

    #[test]
    fn test_boards_follow_order_link_order() {
        let b1 = Board::new("Zeta", "", 10.0, 10.0).unwrap();
        let b2 = Board::new("Alpha", "", 10.0, 10.0).unwrap();
        let o = order("Order-5", &[&b1, &b2]);

        let snapshot = OrderGraph::new(o, vec![b2.clone(), b1.clone()], Vec::new()).snapshot(at(4));

        let names: Vec<&str> = snapshot.boards.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let r = Component::new("R_10K", "", 1).unwrap();
        let c = Component::new("C_100n", "", 1).unwrap();
        let mut b = Board::new("B", "", 10.0, 10.0).unwrap();
        b.add_component(r.id(), 2).unwrap();
        b.add_component(c.id(), 7).unwrap();
        let graph = OrderGraph::new(order("O", &[&b]), vec![b], vec![r, c]);

        let first = graph.snapshot(at(5));
        let second = graph.snapshot(at(6));

        assert_eq!(first.order, second.order);
        assert_eq!(first.boards, second.boards);
        assert_eq!(first.bom, second.bom);
        assert_ne!(first.downloaded_at_utc, second.downloaded_at_utc);
    }

    #[test]
    fn test_build_snapshot_requires_order() {
        let id = Uuid::new_v4();
        let err = build_snapshot(id, None, at(7)).unwrap_err();
        assert_eq!(err, DomainError::not_found("order", id));
    }

    #[test]
    fn test_bom_sort_ignores_case_and_is_total() {
        let line = |name: &str, id: u128| BomLine {
            component_id: Uuid::from_u128(id),
            component_name: name.to_string(),
            total_quantity: 1,
        };
        let mut lines = vec![
            line("u_mcu", 1),
            line("R_10K", 2),
            line("C_100N", 4),
            line("C_100N", 3),
            line("c_100n", 5),
        ];

        lines.sort_by(compare_bom_lines);

        let keys: Vec<(&str, u128)> = lines
            .iter()
            .map(|l| (l.component_name.as_str(), l.component_id.as_u128()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("C_100N", 3),
                ("C_100N", 4),
                ("c_100n", 5),
                ("R_10K", 2),
                ("u_mcu", 1)
            ]
        );
    }

    #[test]
    fn test_referenced_component_ids_are_distinct() {
        let shared = Uuid::new_v4();
        let mut b1 = Board::new("B1", "", 1.0, 1.0).unwrap();
        b1.add_component(shared, 1).unwrap();
        let mut b2 = Board::new("B2", "", 1.0, 1.0).unwrap();
        b2.add_component(shared, 1).unwrap();
        b2.add_component(Uuid::new_v4(), 1).unwrap();

        let ids = OrderGraph::referenced_component_ids(&[b1, b2]);
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], shared);
    }
}
