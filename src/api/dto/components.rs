//! DTOs for component endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::services::ComponentInput;
use crate::domain::entities::Component;

/// Request body for `POST /api/components` and `PUT /api/components/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct ComponentRequest {
    /// Trimmed and length-checked by the domain guard.
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 1, message = "must be > 0"))]
    pub quantity: i32,
}

impl From<ComponentRequest> for ComponentInput {
    fn from(req: ComponentRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            quantity: req.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub quantity: i32,
}

impl From<&Component> for ComponentResponse {
    fn from(c: &Component) -> Self {
        Self {
            id: c.id(),
            name: c.name().to_string(),
            description: c.description().to_string(),
            quantity: c.quantity(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentListResponse {
    pub items: Vec<ComponentResponse>,
}
