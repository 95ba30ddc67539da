//! Pullout request service
//!
//! Stock removals (waste, internal use) modeled as a request/approval
//! workflow. Creating a pullout only records the request; the ledger is
//! touched on the pending -> approved transition, and an approved record
//! that gets deleted re-adds its quantity.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::models::{PulloutRequest, PulloutUpdate};
use shared::types::PulloutStatus;
use shared::validation::{validate_pullout_quantity, validate_pullout_reason};

use crate::error::{AppError, AppResult};
use crate::services::stock::StockLedger;

/// Service for pullout transactions
#[derive(Clone)]
pub struct PulloutService {
    db: PgPool,
}

/// A pullout record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Pullout {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub staff_id: Uuid,
    pub manager_id: Option<Uuid>,
    pub quantity: Decimal,
    pub reason: String,
    pub pullout_date: NaiveDate,
    pub status: String,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for an approve/reject decision
#[derive(Debug, Deserialize)]
pub struct PulloutDecision {
    pub manager_id: Uuid,
}

impl Pullout {
    fn parsed_status(&self) -> AppResult<PulloutStatus> {
        PulloutStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(format!("unknown pullout status '{}'", self.status))
        })
    }
}

impl PulloutService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a pullout request. No stock is deducted here; availability is
    /// only checked as a fast path so obviously unfillable requests are
    /// rejected up front.
    pub async fn create(&self, input: PulloutRequest) -> AppResult<Pullout> {
        Self::validate_request(input.quantity, &input.reason)?;

        let available = self.ingredient_quantity(input.ingredient_id).await?;
        if input.quantity > available {
            return Err(AppError::InsufficientStock { available });
        }

        let date = input.date.unwrap_or_else(|| Utc::now().date_naive());

        let pullout = sqlx::query_as::<_, Pullout>(
            r#"
            INSERT INTO pullouts (ingredient_id, staff_id, manager_id, quantity, reason, pullout_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, ingredient_id, staff_id, manager_id, quantity, reason, pullout_date,
                      status, approved_at, created_at
            "#,
        )
        .bind(input.ingredient_id)
        .bind(input.staff_id)
        .bind(input.manager_id)
        .bind(input.quantity)
        .bind(input.reason.trim())
        .bind(date)
        .bind(PulloutStatus::Pending.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(pullout)
    }

    /// Approve a pending pullout. This is the point the stock is actually
    /// deducted; on a shortfall the record stays pending and the error
    /// carries the available quantity.
    pub async fn approve(&self, pullout_id: Uuid, decision: PulloutDecision) -> AppResult<Pullout> {
        let mut tx = self.db.begin().await?;

        let pullout = Self::load_for_update(&mut tx, pullout_id).await?;
        Self::require_pending(&pullout, "approve")?;

        StockLedger::adjust_and_validate(&mut tx, pullout.ingredient_id, -pullout.quantity)
            .await?;

        let approved = sqlx::query_as::<_, Pullout>(
            r#"
            UPDATE pullouts
            SET status = $1, manager_id = $2, approved_at = NOW()
            WHERE id = $3
            RETURNING id, ingredient_id, staff_id, manager_id, quantity, reason, pullout_date,
                      status, approved_at, created_at
            "#,
        )
        .bind(PulloutStatus::Approved.as_str())
        .bind(decision.manager_id)
        .bind(pullout_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(pullout_id = %pullout_id, quantity = %approved.quantity, "pullout approved");

        Ok(approved)
    }

    /// Reject a pending pullout. No stock effect.
    pub async fn reject(&self, pullout_id: Uuid, decision: PulloutDecision) -> AppResult<Pullout> {
        let mut tx = self.db.begin().await?;

        let pullout = Self::load_for_update(&mut tx, pullout_id).await?;
        Self::require_pending(&pullout, "reject")?;

        let rejected = sqlx::query_as::<_, Pullout>(
            r#"
            UPDATE pullouts
            SET status = $1, manager_id = $2
            WHERE id = $3
            RETURNING id, ingredient_id, staff_id, manager_id, quantity, reason, pullout_date,
                      status, approved_at, created_at
            "#,
        )
        .bind(PulloutStatus::Rejected.as_str())
        .bind(decision.manager_id)
        .bind(pullout_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(rejected)
    }

    /// Edit a pending pullout. Availability is re-validated against the
    /// target ingredient (the new one when it changed); stock itself stays
    /// untouched until approval.
    pub async fn update(&self, pullout_id: Uuid, input: PulloutUpdate) -> AppResult<Pullout> {
        let mut tx = self.db.begin().await?;

        let pullout = Self::load_for_update(&mut tx, pullout_id).await?;
        if !pullout.parsed_status()?.is_editable() {
            return Err(AppError::InvalidStateTransition(format!(
                "cannot edit a pullout in status '{}'",
                pullout.status
            )));
        }

        let (ingredient_id, quantity, reason, date) = merge_update(&pullout, &input);
        Self::validate_request(quantity, &reason)?;

        let available = sqlx::query_scalar::<_, Decimal>(
            "SELECT quantity FROM ingredients WHERE id = $1",
        )
        .bind(ingredient_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        if quantity > available {
            return Err(AppError::InsufficientStock { available });
        }

        let updated = sqlx::query_as::<_, Pullout>(
            r#"
            UPDATE pullouts
            SET ingredient_id = $1, quantity = $2, reason = $3, pullout_date = $4
            WHERE id = $5
            RETURNING id, ingredient_id, staff_id, manager_id, quantity, reason, pullout_date,
                      status, approved_at, created_at
            "#,
        )
        .bind(ingredient_id)
        .bind(quantity)
        .bind(reason.trim())
        .bind(date)
        .bind(pullout_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Delete a pullout. Approved records re-add their quantity to stock
    /// first; pending and rejected records never touched stock.
    pub async fn delete(&self, pullout_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let pullout = Self::load_for_update(&mut tx, pullout_id).await?;

        if pullout.parsed_status()? == PulloutStatus::Approved {
            StockLedger::adjust(&mut tx, pullout.ingredient_id, pullout.quantity).await?;
        }

        sqlx::query("DELETE FROM pullouts WHERE id = $1")
            .bind(pullout_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(pullout_id = %pullout_id, "pullout deleted");

        Ok(())
    }

    /// Get a single pullout
    pub async fn get(&self, pullout_id: Uuid) -> AppResult<Pullout> {
        let pullout = sqlx::query_as::<_, Pullout>(
            r#"
            SELECT id, ingredient_id, staff_id, manager_id, quantity, reason, pullout_date,
                   status, approved_at, created_at
            FROM pullouts
            WHERE id = $1
            "#,
        )
        .bind(pullout_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Pullout".to_string()))?;

        Ok(pullout)
    }

    /// List pullouts, newest first
    pub async fn list(&self) -> AppResult<Vec<Pullout>> {
        let pullouts = sqlx::query_as::<_, Pullout>(
            r#"
            SELECT id, ingredient_id, staff_id, manager_id, quantity, reason, pullout_date,
                   status, approved_at, created_at
            FROM pullouts
            ORDER BY pullout_date DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(pullouts)
    }

    fn validate_request(quantity: Decimal, reason: &str) -> AppResult<()> {
        validate_pullout_quantity(quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;
        validate_pullout_reason(reason).map_err(|msg| AppError::Validation {
            field: "reason".to_string(),
            message: msg.to_string(),
        })?;
        Ok(())
    }

    fn require_pending(pullout: &Pullout, action: &str) -> AppResult<()> {
        if pullout.parsed_status()? != PulloutStatus::Pending {
            return Err(AppError::InvalidStateTransition(format!(
                "cannot {} a pullout in status '{}'",
                action, pullout.status
            )));
        }
        Ok(())
    }

    async fn load_for_update(
        tx: &mut Transaction<'_, Postgres>,
        pullout_id: Uuid,
    ) -> AppResult<Pullout> {
        sqlx::query_as::<_, Pullout>(
            r#"
            SELECT id, ingredient_id, staff_id, manager_id, quantity, reason, pullout_date,
                   status, approved_at, created_at
            FROM pullouts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(pullout_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Pullout".to_string()))
    }

    async fn ingredient_quantity(&self, ingredient_id: Uuid) -> AppResult<Decimal> {
        sqlx::query_scalar::<_, Decimal>("SELECT quantity FROM ingredients WHERE id = $1")
            .bind(ingredient_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))
    }
}

/// Resolve the target field values for a pending-pullout edit; absent
/// fields keep their current value.
fn merge_update(existing: &Pullout, input: &PulloutUpdate) -> (Uuid, Decimal, String, NaiveDate) {
    (
        input.ingredient_id.unwrap_or(existing.ingredient_id),
        input.quantity.unwrap_or(existing.quantity),
        input
            .reason
            .clone()
            .unwrap_or_else(|| existing.reason.clone()),
        input.date.unwrap_or(existing.pullout_date),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn existing() -> Pullout {
        Pullout {
            id: Uuid::new_v4(),
            ingredient_id: Uuid::new_v4(),
            staff_id: Uuid::new_v4(),
            manager_id: None,
            quantity: Decimal::from(5),
            reason: "spoilage".to_string(),
            pullout_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status: "pending".to_string(),
            approved_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_merge_keeps_existing_when_absent() {
        let pullout = existing();
        let (ingredient_id, quantity, reason, date) =
            merge_update(&pullout, &PulloutUpdate::default());

        assert_eq!(ingredient_id, pullout.ingredient_id);
        assert_eq!(quantity, pullout.quantity);
        assert_eq!(reason, pullout.reason);
        assert_eq!(date, pullout.pullout_date);
    }

    #[test]
    fn test_merge_switches_ingredient_and_quantity() {
        let pullout = existing();
        let new_ingredient = Uuid::new_v4();
        let update = PulloutUpdate {
            ingredient_id: Some(new_ingredient),
            quantity: Some(Decimal::from_str("2.5").unwrap()),
            ..Default::default()
        };

        let (ingredient_id, quantity, reason, _) = merge_update(&pullout, &update);
        assert_eq!(ingredient_id, new_ingredient);
        assert_eq!(quantity, Decimal::from_str("2.5").unwrap());
        assert_eq!(reason, "spoilage");
    }

    #[test]
    fn test_validate_request_rules() {
        assert!(PulloutService::validate_request(Decimal::ONE, "waste").is_ok());
        assert!(PulloutService::validate_request(Decimal::ZERO, "waste").is_err());
        assert!(PulloutService::validate_request(Decimal::ONE, "  ").is_err());
    }
}
