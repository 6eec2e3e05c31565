//! DTOs for order endpoints.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::services::OrderInput;
use crate::domain::entities::Order;

/// Request body for `POST /api/orders` and `PUT /api/orders/{id}`.
///
/// `order_date` is an RFC 3339 timestamp; its offset is kept as given.
#[derive(Debug, Deserialize, Validate)]
pub struct OrderRequest {
    /// Trimmed and length-checked by the domain guard.
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub order_date: DateTime<FixedOffset>,
}

impl From<OrderRequest> for OrderInput {
    fn from(req: OrderRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            order_date: req.order_date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub order_date: DateTime<FixedOffset>,
    pub board_ids: Vec<Uuid>,
}

impl From<&Order> for OrderResponse {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id(),
            name: o.name().to_string(),
            description: o.description().to_string(),
            order_date: o.order_date(),
            board_ids: o.board_ids().collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub items: Vec<OrderResponse>,
}
