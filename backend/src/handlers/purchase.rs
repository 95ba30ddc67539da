//! HTTP handlers for purchase order endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::models::PurchaseRequest;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::DeleteResponse;
use crate::services::purchase::{Purchase, PurchaseService, PurchaseWithItems};
use crate::AppState;

fn service(state: AppState) -> PurchaseService {
    PurchaseService::new(state.db, state.config.limits.max_unit_price)
}

/// Create a purchase order
pub async fn create_purchase(
    State(state): State<AppState>,
    Json(input): Json<PurchaseRequest>,
) -> AppResult<(StatusCode, Json<PurchaseWithItems>)> {
    let purchase = service(state).create(input).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

/// Get a purchase order with its line items
pub async fn get_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<PurchaseWithItems>> {
    let purchase = service(state).get(purchase_id).await?;
    Ok(Json(purchase))
}

/// List purchase orders
pub async fn list_purchases(State(state): State<AppState>) -> AppResult<Json<Vec<Purchase>>> {
    let purchases = service(state).list().await?;
    Ok(Json(purchases))
}

/// Replace a purchase order (full-replace edit)
pub async fn update_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
    Json(input): Json<PurchaseRequest>,
) -> AppResult<Json<PurchaseWithItems>> {
    let purchase = service(state).update(purchase_id, input).await?;
    Ok(Json(purchase))
}

/// Delete a purchase order, reversing its stock effect
pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    service(state).delete(purchase_id).await?;
    Ok(Json(DeleteResponse::ok()))
}
