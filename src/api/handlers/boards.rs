//! Handlers for board endpoints and component placements.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::boards::{
    AddPlacementRequest, BoardListResponse, BoardRequest, BoardResponse, UpdatePlacementRequest,
};
use crate::api::dto::pagination::ListQuery;
use crate::error::AppError;
use crate::state::AppState;

/// `POST /api/boards`
pub async fn create_board_handler(
    State(state): State<AppState>,
    Json(payload): Json<BoardRequest>,
) -> Result<(StatusCode, Json<BoardResponse>), AppError> {
    payload.validate()?;

    let board = state.board_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(BoardResponse::from(&board))))
}

/// `GET /api/boards?skip=&take=&name=`
pub async fn list_boards_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<BoardListResponse>, AppError> {
    let boards = state
        .board_service
        .search(query.name.as_deref(), query.paging())
        .await?;

    Ok(Json(BoardListResponse {
        items: boards.iter().map(BoardResponse::from).collect(),
    }))
}

/// `GET /api/boards/{id}`
pub async fn get_board_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BoardResponse>, AppError> {
    let board = state.board_service.get(id).await?;
    Ok(Json(BoardResponse::from(&board)))
}

/// `PUT /api/boards/{id}`
///
/// Updates scalar fields only; placements are left untouched.
pub async fn update_board_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BoardRequest>,
) -> Result<Json<BoardResponse>, AppError> {
    payload.validate()?;

    let board = state.board_service.update(id, payload.into()).await?;
    Ok(Json(BoardResponse::from(&board)))
}

/// `DELETE /api/boards/{id}`
///
/// Removes the board, its placements, and its links from every order.
pub async fn delete_board_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.board_service.delete(id).await? {
        return Err(AppError::not_found("Board not found", json!({ "id": id })));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/boards/{id}/components`
///
/// # Request Body
///
/// ```json
/// { "component_id": "…", "placement_quantity": 4 }
/// ```
///
/// # Response Codes
///
/// - **200 OK**: Placement added, returns the updated board
/// - **400 Bad Request**: Quantity not positive
/// - **404 Not Found**: Board or component does not exist
/// - **409 Conflict**: Component already placed on this board
pub async fn add_placement_handler(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Json(payload): Json<AddPlacementRequest>,
) -> Result<Json<BoardResponse>, AppError> {
    payload.validate()?;

    let board = state
        .board_service
        .add_component(board_id, payload.component_id, payload.placement_quantity)
        .await?;
    Ok(Json(BoardResponse::from(&board)))
}

/// `PUT /api/boards/{id}/components/{component_id}`
pub async fn update_placement_handler(
    State(state): State<AppState>,
    Path((board_id, component_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdatePlacementRequest>,
) -> Result<Json<BoardResponse>, AppError> {
    payload.validate()?;

    let board = state
        .board_service
        .update_component_quantity(board_id, component_id, payload.placement_quantity)
        .await?;
    Ok(Json(BoardResponse::from(&board)))
}

/// `DELETE /api/boards/{id}/components/{component_id}`
pub async fn remove_placement_handler(
    State(state): State<AppState>,
    Path((board_id, component_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BoardResponse>, AppError> {
    let board = state
        .board_service
        .remove_component(board_id, component_id)
        .await?;
    Ok(Json(BoardResponse::from(&board)))
}
