//! Handlers for order endpoints, board links and the production download.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::orders::{OrderListResponse, OrderRequest, OrderResponse};
use crate::api::dto::pagination::ListQuery;
use crate::error::AppError;
use crate::state::AppState;

/// `POST /api/orders`
pub async fn create_order_handler(
    State(state): State<AppState>,
    Json(payload): Json<OrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    payload.validate()?;

    let order = state.order_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

/// `GET /api/orders?skip=&take=&name=`
///
/// Newest order date first.
pub async fn list_orders_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<OrderListResponse>, AppError> {
    let orders = state
        .order_service
        .search(query.name.as_deref(), query.paging())
        .await?;

    Ok(Json(OrderListResponse {
        items: orders.iter().map(OrderResponse::from).collect(),
    }))
}

/// `GET /api/orders/{id}`
pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.order_service.get(id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// `PUT /api/orders/{id}`
pub async fn update_order_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    payload.validate()?;

    let order = state.order_service.update(id, payload.into()).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// `DELETE /api/orders/{id}`
pub async fn delete_order_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.order_service.delete(id).await? {
        return Err(AppError::not_found("Order not found", json!({ "id": id })));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/orders/{id}/boards/{board_id}`
///
/// # Response Codes
///
/// - **200 OK**: Board linked, returns the updated order
/// - **404 Not Found**: Order or board does not exist
/// - **409 Conflict**: Board already linked to this order
pub async fn add_order_board_handler(
    State(state): State<AppState>,
    Path((order_id, board_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.order_service.add_board(order_id, board_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// `DELETE /api/orders/{id}/boards/{board_id}`
pub async fn remove_order_board_handler(
    State(state): State<AppState>,
    Path((order_id, board_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.order_service.remove_board(order_id, board_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// Downloads the production snapshot of an order as a JSON attachment.
///
/// # Endpoint
///
/// `GET /api/orders/{id}/download`
///
/// The file name is `order_{id}_{yyyyMMdd_HHmmss}_utc.json`, stamped with
/// the time the snapshot was taken.
pub async fn download_order_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let payload = state.order_service.download(id).await?;

    let disposition = format!("attachment; filename=\"{}\"", payload.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, payload.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        payload.content,
    )
        .into_response())
}
