//! HTTP handlers for consignment endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::models::ConsignmentRequest;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::DeleteResponse;
use crate::services::consignment::{Consignment, ConsignmentService, ConsignmentWithItems};
use crate::AppState;

fn service(state: AppState) -> ConsignmentService {
    ConsignmentService::new(state.db, state.config.limits.max_unit_price)
}

/// Create a consignment
pub async fn create_consignment(
    State(state): State<AppState>,
    Json(input): Json<ConsignmentRequest>,
) -> AppResult<(StatusCode, Json<ConsignmentWithItems>)> {
    let consignment = service(state).create(input).await?;
    Ok((StatusCode::CREATED, Json(consignment)))
}

/// Get a consignment with its line items
pub async fn get_consignment(
    State(state): State<AppState>,
    Path(consignment_id): Path<Uuid>,
) -> AppResult<Json<ConsignmentWithItems>> {
    let consignment = service(state).get(consignment_id).await?;
    Ok(Json(consignment))
}

/// List consignments
pub async fn list_consignments(State(state): State<AppState>) -> AppResult<Json<Vec<Consignment>>> {
    let consignments = service(state).list().await?;
    Ok(Json(consignments))
}

/// Replace a consignment (full-replace edit)
pub async fn update_consignment(
    State(state): State<AppState>,
    Path(consignment_id): Path<Uuid>,
    Json(input): Json<ConsignmentRequest>,
) -> AppResult<Json<ConsignmentWithItems>> {
    let consignment = service(state).update(consignment_id, input).await?;
    Ok(Json(consignment))
}

/// Delete a consignment record only; inventory levels are not adjusted
pub async fn delete_consignment(
    State(state): State<AppState>,
    Path(consignment_id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    service(state).delete(consignment_id).await?;
    Ok(Json(DeleteResponse::ok()))
}
