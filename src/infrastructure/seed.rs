//! Demo data for a fresh installation.

use tracing::info;

use crate::application::clock::Clock;
use crate::application::services::{BoardInput, ComponentInput, OrderInput};
use crate::domain::paging::Paging;
use crate::error::AppError;
use crate::state::AppState;

/// What [`seed_demo_data`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded,
    /// Storage already held at least one root.
    Skipped,
}

/// Seeds three components, two boards and one order through the services.
///
/// Does nothing when any component, board or order already exists.
pub async fn seed_demo_data(state: &AppState, clock: &dyn Clock) -> Result<SeedOutcome, AppError> {
    let first_row = Paging::new(None, Some(1));
    let has_data = !state.storage.components.search(None, first_row).await?.is_empty()
        || !state.storage.boards.search(None, first_row).await?.is_empty()
        || !state.storage.orders.search(None, first_row).await?.is_empty();
    if has_data {
        info!("Seeding skipped, storage already contains data");
        return Ok(SeedOutcome::Skipped);
    }

    info!("Seeding storage with demo data");

    let components = &state.component_service;
    let r10k = components.create(component("R_10K", "Resistor 10k", 5000)).await?;
    let c100n = components.create(component("C_100N", "Capacitor 100nF", 8000)).await?;
    let mcu = components.create(component("U_MCU", "Microcontroller", 200)).await?;

    let boards = &state.board_service;
    let board_a = boards.create(board("Board-A", "Main PCB", 100.0, 50.0)).await?;
    let board_b = boards.create(board("Board-B", "IO PCB", 80.0, 40.0)).await?;

    for (component_id, quantity) in [(r10k.id(), 4), (c100n.id(), 2), (mcu.id(), 1)] {
        boards.add_component(board_a.id(), component_id, quantity).await?;
    }
    for (component_id, quantity) in [(r10k.id(), 2), (c100n.id(), 1)] {
        boards.add_component(board_b.id(), component_id, quantity).await?;
    }

    let orders = &state.order_service;
    let order = orders
        .create(OrderInput {
            name: "Order-001".to_string(),
            description: "Seeded demo order".to_string(),
            order_date: clock.now_utc().fixed_offset(),
        })
        .await?;
    orders.add_board(order.id(), board_a.id()).await?;
    orders.add_board(order.id(), board_b.id()).await?;

    info!(order_id = %order.id(), boards = 2, components = 3, "Seeding finished");
    Ok(SeedOutcome::Seeded)
}

fn component(name: &str, description: &str, quantity: i32) -> ComponentInput {
    ComponentInput {
        name: name.to_string(),
        description: description.to_string(),
        quantity,
    }
}

fn board(name: &str, description: &str, length: f64, width: f64) -> BoardInput {
    BoardInput {
        name: name.to_string(),
        description: description.to_string(),
        length,
        width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::FixedClock;
    use crate::application::services::AuthService;
    use crate::infrastructure::storage::Storage;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 12, 21, 8, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_seed_then_skip() {
        let state = AppState::new(Storage::memory(), Arc::new(clock()), AuthService::disabled());

        assert_eq!(seed_demo_data(&state, &clock()).await.unwrap(), SeedOutcome::Seeded);
        assert_eq!(seed_demo_data(&state, &clock()).await.unwrap(), SeedOutcome::Skipped);

        let orders = state.order_service.search(None, Paging::default()).await.unwrap();
        assert_eq!(orders.len(), 1);

        let snapshot = state.order_service.snapshot(orders[0].id()).await.unwrap();
        let bom: Vec<(&str, i64)> = snapshot
            .bom
            .iter()
            .map(|l| (l.component_name.as_str(), l.total_quantity))
            .collect();
        assert_eq!(bom, vec![("C_100N", 3), ("R_10K", 6), ("U_MCU", 1)]);
    }
}
