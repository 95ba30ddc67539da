//! HTTP handlers for ingredient catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::ingredient::{Ingredient, IngredientService};
use crate::AppState;

/// List all ingredients
pub async fn list_ingredients(State(state): State<AppState>) -> AppResult<Json<Vec<Ingredient>>> {
    let service = IngredientService::new(state.db);
    let ingredients = service.list().await?;
    Ok(Json(ingredients))
}

/// Get a single ingredient
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<Uuid>,
) -> AppResult<Json<Ingredient>> {
    let service = IngredientService::new(state.db);
    let ingredient = service.get(ingredient_id).await?;
    Ok(Json(ingredient))
}

/// List ingredients at or below their reorder threshold
pub async fn list_low_stock(State(state): State<AppState>) -> AppResult<Json<Vec<Ingredient>>> {
    let service = IngredientService::new(state.db);
    let ingredients = service.low_stock().await?;
    Ok(Json(ingredients))
}
