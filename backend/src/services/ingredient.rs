//! Ingredient catalog reads
//!
//! The catalog itself is maintained elsewhere; this service only reads the
//! rows the transactional core adjusts.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Service for ingredient catalog queries
#[derive(Clone)]
pub struct IngredientService {
    db: PgPool,
}

/// An ingredient catalog row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub minimum_quantity: Decimal,
    pub last_restock_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl IngredientService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all ingredients
    pub async fn list(&self) -> AppResult<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, unit, quantity, minimum_quantity, last_restock_date, created_at
            FROM ingredients
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(ingredients)
    }

    /// Get a single ingredient
    pub async fn get(&self, ingredient_id: Uuid) -> AppResult<Ingredient> {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, unit, quantity, minimum_quantity, last_restock_date, created_at
            FROM ingredients
            WHERE id = $1
            "#,
        )
        .bind(ingredient_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        Ok(ingredient)
    }

    /// List ingredients at or below their reorder threshold
    pub async fn low_stock(&self) -> AppResult<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, unit, quantity, minimum_quantity, last_restock_date, created_at
            FROM ingredients
            WHERE quantity <= minimum_quantity
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(ingredients)
    }
}
