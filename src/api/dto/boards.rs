//! DTOs for board and placement endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::services::BoardInput;
use crate::domain::entities::Board;

/// Request body for `POST /api/boards` and `PUT /api/boards/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct BoardRequest {
    /// Trimmed and length-checked by the domain guard.
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(exclusive_min = 0.0, message = "must be > 0"))]
    pub length: f64,

    #[validate(range(exclusive_min = 0.0, message = "must be > 0"))]
    pub width: f64,
}

impl From<BoardRequest> for BoardInput {
    fn from(req: BoardRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            length: req.length,
            width: req.width,
        }
    }
}

/// Request body for `POST /api/boards/{id}/components`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddPlacementRequest {
    pub component_id: Uuid,

    #[validate(range(min = 1, message = "must be > 0"))]
    pub placement_quantity: i32,
}

/// Request body for `PUT /api/boards/{id}/components/{component_id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePlacementRequest {
    #[validate(range(min = 1, message = "must be > 0"))]
    pub placement_quantity: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlacementItem {
    pub component_id: Uuid,
    pub placement_quantity: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BoardResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub length: f64,
    pub width: f64,
    pub components: Vec<PlacementItem>,
}

impl From<&Board> for BoardResponse {
    fn from(b: &Board) -> Self {
        Self {
            id: b.id(),
            name: b.name().to_string(),
            description: b.description().to_string(),
            length: b.length(),
            width: b.width(),
            components: b
                .component_links()
                .iter()
                .map(|link| PlacementItem {
                    component_id: link.component_id(),
                    placement_quantity: link.placement_quantity(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BoardListResponse {
    pub items: Vec<BoardResponse>,
}
