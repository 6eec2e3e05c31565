//! Handlers for component endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::components::{ComponentListResponse, ComponentRequest, ComponentResponse};
use crate::api::dto::pagination::ListQuery;
use crate::error::AppError;
use crate::state::AppState;

/// `POST /api/components`
pub async fn create_component_handler(
    State(state): State<AppState>,
    Json(payload): Json<ComponentRequest>,
) -> Result<(StatusCode, Json<ComponentResponse>), AppError> {
    payload.validate()?;

    let component = state.component_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ComponentResponse::from(&component))))
}

/// `GET /api/components?skip=&take=&name=`
///
/// Ordered by name, case-insensitively.
pub async fn list_components_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ComponentListResponse>, AppError> {
    let components = state
        .component_service
        .search(query.name.as_deref(), query.paging())
        .await?;

    Ok(Json(ComponentListResponse {
        items: components.iter().map(ComponentResponse::from).collect(),
    }))
}

/// `GET /api/components/{id}`
pub async fn get_component_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ComponentResponse>, AppError> {
    let component = state.component_service.get(id).await?;
    Ok(Json(ComponentResponse::from(&component)))
}

/// `PUT /api/components/{id}`
pub async fn update_component_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ComponentRequest>,
) -> Result<Json<ComponentResponse>, AppError> {
    payload.validate()?;

    let component = state.component_service.update(id, payload.into()).await?;
    Ok(Json(ComponentResponse::from(&component)))
}

/// `DELETE /api/components/{id}`
///
/// Also removes every placement of the component on any board.
///
/// # Response Codes
///
/// - **204 No Content**: Deleted
/// - **404 Not Found**: No such component
pub async fn delete_component_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.component_service.delete(id).await? {
        return Err(AppError::not_found(
            "Component not found",
            serde_json::json!({ "id": id }),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
