//! Stock movement handlers

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::audit::client_ip;
use crate::services::movement::SaveMovementInput;
use crate::services::{AuditService, MovementService, StorageService};
use crate::AppState;
use crate::models::Movement;
use shared::types::MovementFilter;

/// List movements, with optional query filters
pub async fn list_movements(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(filter): Query<MovementFilter>,
) -> AppResult<Json<Vec<Movement>>> {
    let movements = MovementService::new(state.db).list(&filter).await?;
    Ok(Json(movements))
}

/// Get a single movement
pub async fn get_movement(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(movement_id): Path<Uuid>,
) -> AppResult<Json<Movement>> {
    let movement = MovementService::new(state.db).get(movement_id).await?;
    Ok(Json(movement))
}

/// Create a new movement
pub async fn create_movement(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    Json(input): Json<SaveMovementInput>,
) -> AppResult<(StatusCode, Json<Movement>)> {
    let movement = MovementService::new(state.db.clone()).create(input).await?;

    AuditService::new(state.db)
        .record(
            "MOVEMENT_CREATE",
            &format!(
                "User '{}' created {} movement {} ({} lines)",
                user.username,
                movement.movement_type.as_str(),
                movement.id,
                movement.products.len()
            ),
            &client_ip(&headers),
        )
        .await;

    Ok((StatusCode::CREATED, Json(movement)))
}

/// Update an existing movement
pub async fn update_movement(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    Path(movement_id): Path<Uuid>,
    Json(input): Json<SaveMovementInput>,
) -> AppResult<Json<Movement>> {
    let movement = MovementService::new(state.db.clone())
        .update(movement_id, input)
        .await?;

    AuditService::new(state.db)
        .record(
            "MOVEMENT_UPDATE",
            &format!("User '{}' updated movement {}", user.username, movement.id),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(movement))
}

/// Delete a movement, releasing its stored files
pub async fn delete_movement(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    Path(movement_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let files = MovementService::new(state.db.clone())
        .delete(movement_id)
        .await?;

    let storage = StorageService::new(&state.config);
    if let Some(path) = files.image_path.as_deref() {
        storage.remove(path).await;
    }
    if let Some(path) = files.xml_path.as_deref() {
        storage.remove(path).await;
    }

    AuditService::new(state.db)
        .record(
            "MOVEMENT_DELETE",
            &format!("User '{}' deleted movement {}", user.username, movement_id),
            &client_ip(&headers),
        )
        .await;

    Ok(StatusCode::NO_CONTENT)
}
