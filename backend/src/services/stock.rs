//! Stock ledger primitives
//!
//! The single authoritative write path for `ingredients.quantity`. Purchase,
//! pullout, and consignment services never touch the column directly; they
//! compose these two operations inside their own transactions.

use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Atomic per-ingredient quantity adjustments.
///
/// Holds no pool and no transaction semantics of its own: every call runs
/// on the caller's open connection, so a rollback of the caller's
/// transaction also rolls back the adjustment.
pub struct StockLedger;

impl StockLedger {
    /// Apply `quantity += delta` to one ingredient row.
    ///
    /// The schema-level `CHECK (quantity >= 0)` still applies; an adjustment
    /// that would go negative fails the caller's whole transaction.
    pub async fn adjust(
        conn: &mut PgConnection,
        ingredient_id: Uuid,
        delta: Decimal,
    ) -> AppResult<()> {
        let result = sqlx::query("UPDATE ingredients SET quantity = quantity + $1 WHERE id = $2")
            .bind(delta)
            .bind(ingredient_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ingredient".to_string()));
        }
        Ok(())
    }

    /// Like [`StockLedger::adjust`], but a negative delta first reads the
    /// current quantity (row-locked) and aborts without mutating when the
    /// decrement would drive it below zero.
    pub async fn adjust_and_validate(
        conn: &mut PgConnection,
        ingredient_id: Uuid,
        delta: Decimal,
    ) -> AppResult<()> {
        if delta < Decimal::ZERO {
            let available = sqlx::query_scalar::<_, Decimal>(
                "SELECT quantity FROM ingredients WHERE id = $1 FOR UPDATE",
            )
            .bind(ingredient_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

            if available + delta < Decimal::ZERO {
                return Err(AppError::InsufficientStock { available });
            }
        }

        Self::adjust(conn, ingredient_id, delta).await
    }
}
