//! HTTP handlers for pullout endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::models::{PulloutRequest, PulloutUpdate};
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::DeleteResponse;
use crate::services::pullout::{Pullout, PulloutDecision, PulloutService};
use crate::AppState;

/// Create a pullout request (pending; no stock effect)
pub async fn create_pullout(
    State(state): State<AppState>,
    Json(input): Json<PulloutRequest>,
) -> AppResult<(StatusCode, Json<Pullout>)> {
    let service = PulloutService::new(state.db);
    let pullout = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(pullout)))
}

/// Get a single pullout
pub async fn get_pullout(
    State(state): State<AppState>,
    Path(pullout_id): Path<Uuid>,
) -> AppResult<Json<Pullout>> {
    let service = PulloutService::new(state.db);
    let pullout = service.get(pullout_id).await?;
    Ok(Json(pullout))
}

/// List pullouts
pub async fn list_pullouts(State(state): State<AppState>) -> AppResult<Json<Vec<Pullout>>> {
    let service = PulloutService::new(state.db);
    let pullouts = service.list().await?;
    Ok(Json(pullouts))
}

/// Approve a pending pullout; this deducts the stock
pub async fn approve_pullout(
    State(state): State<AppState>,
    Path(pullout_id): Path<Uuid>,
    Json(decision): Json<PulloutDecision>,
) -> AppResult<Json<Pullout>> {
    let service = PulloutService::new(state.db);
    let pullout = service.approve(pullout_id, decision).await?;
    Ok(Json(pullout))
}

/// Reject a pending pullout; no stock effect
pub async fn reject_pullout(
    State(state): State<AppState>,
    Path(pullout_id): Path<Uuid>,
    Json(decision): Json<PulloutDecision>,
) -> AppResult<Json<Pullout>> {
    let service = PulloutService::new(state.db);
    let pullout = service.reject(pullout_id, decision).await?;
    Ok(Json(pullout))
}

/// Edit a pending pullout
pub async fn update_pullout(
    State(state): State<AppState>,
    Path(pullout_id): Path<Uuid>,
    Json(input): Json<PulloutUpdate>,
) -> AppResult<Json<Pullout>> {
    let service = PulloutService::new(state.db);
    let pullout = service.update(pullout_id, input).await?;
    Ok(Json(pullout))
}

/// Delete a pullout; approved records re-add their stock first
pub async fn delete_pullout(
    State(state): State<AppState>,
    Path(pullout_id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    let service = PulloutService::new(state.db);
    service.delete(pullout_id).await?;
    Ok(Json(DeleteResponse::ok()))
}
