//! Purchase order service
//!
//! Supplier receipts: header + line items written atomically, with the
//! matching stock increments applied through the ledger in the same
//! transaction. Edits reverse every old line before applying the new set;
//! deletes reverse and remove. A failure anywhere rolls back everything.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::models::{PurchaseLine, PurchaseRequest};
use shared::types::PurchaseStatus;
use shared::validation::{lines_total, validate_purchase_lines};

use crate::error::{AppError, AppResult};
use crate::services::stock::StockLedger;

/// Service for purchase order transactions
#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
    max_unit_price: Decimal,
}

/// A purchase order header
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Purchase {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub staff_id: Uuid,
    pub approved_by: Option<Uuid>,
    pub purchase_date: NaiveDate,
    pub status: String,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A persisted purchase line item
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseItem {
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub expiration_date: Option<NaiveDate>,
}

/// A purchase order with its line items
#[derive(Debug, Serialize)]
pub struct PurchaseWithItems {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub items: Vec<PurchaseItem>,
}

impl PurchaseService {
    pub fn new(db: PgPool, max_unit_price: Decimal) -> Self {
        Self { db, max_unit_price }
    }

    /// Create a purchase order: header, lines, and stock increments as one
    /// atomic unit. Every touched ingredient gets its last-restock date
    /// stamped with the purchase date.
    pub async fn create(&self, input: PurchaseRequest) -> AppResult<PurchaseWithItems> {
        let lines = validate_purchase_lines(&input.items, self.max_unit_price)?;
        let total = lines_total(lines.iter().map(|l| &l.subtotal))?;

        self.ensure_supplier_exists(input.supplier_id).await?;
        self.ensure_staff_exists(input.staff_id).await?;

        let mut tx = self.db.begin().await?;

        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (supplier_id, staff_id, purchase_date, status, total_amount, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, supplier_id, staff_id, approved_by, purchase_date, status,
                      total_amount, notes, created_at
            "#,
        )
        .bind(input.supplier_id)
        .bind(input.staff_id)
        .bind(input.purchase_date)
        .bind(PurchaseStatus::Pending.as_str())
        .bind(total)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        let items = Self::apply_lines(&mut tx, purchase.id, input.purchase_date, &lines).await?;

        tx.commit().await?;

        tracing::info!(purchase_id = %purchase.id, total = %total, "purchase created");

        Ok(PurchaseWithItems { purchase, items })
    }

    /// Full-replace edit: reverse the stock effect of every existing line,
    /// delete the lines, then insert and apply the new set — all inside one
    /// transaction, so swapping to a disjoint ingredient set stays
    /// stock-consistent.
    pub async fn update(&self, purchase_id: Uuid, input: PurchaseRequest) -> AppResult<PurchaseWithItems> {
        let lines = validate_purchase_lines(&input.items, self.max_unit_price)?;
        let total = lines_total(lines.iter().map(|l| &l.subtotal))?;

        self.ensure_supplier_exists(input.supplier_id).await?;
        self.ensure_staff_exists(input.staff_id).await?;

        let mut tx = self.db.begin().await?;

        // Row-lock the header for the duration of the rewrite
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM purchases WHERE id = $1 FOR UPDATE")
            .bind(purchase_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        Self::reverse_lines(&mut tx, purchase_id).await?;

        sqlx::query("DELETE FROM purchase_items WHERE purchase_id = $1")
            .bind(purchase_id)
            .execute(&mut *tx)
            .await?;

        let items = Self::apply_lines(&mut tx, purchase_id, input.purchase_date, &lines).await?;

        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            UPDATE purchases
            SET supplier_id = $1, staff_id = $2, purchase_date = $3, total_amount = $4, notes = $5
            WHERE id = $6
            RETURNING id, supplier_id, staff_id, approved_by, purchase_date, status,
                      total_amount, notes, created_at
            "#,
        )
        .bind(input.supplier_id)
        .bind(input.staff_id)
        .bind(input.purchase_date)
        .bind(total)
        .bind(&input.notes)
        .bind(purchase_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(purchase_id = %purchase_id, total = %total, "purchase updated");

        Ok(PurchaseWithItems { purchase, items })
    }

    /// Delete a purchase: reverse every line's stock effect, then remove
    /// lines and header, atomically.
    pub async fn delete(&self, purchase_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM purchases WHERE id = $1 FOR UPDATE")
            .bind(purchase_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        Self::reverse_lines(&mut tx, purchase_id).await?;

        sqlx::query("DELETE FROM purchase_items WHERE purchase_id = $1")
            .bind(purchase_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(purchase_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(purchase_id = %purchase_id, "purchase deleted");

        Ok(())
    }

    /// Get a purchase with its line items
    pub async fn get(&self, purchase_id: Uuid) -> AppResult<PurchaseWithItems> {
        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, supplier_id, staff_id, approved_by, purchase_date, status,
                   total_amount, notes, created_at
            FROM purchases
            WHERE id = $1
            "#,
        )
        .bind(purchase_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        let items = sqlx::query_as::<_, PurchaseItem>(
            r#"
            SELECT id, purchase_id, ingredient_id, quantity, unit_price, subtotal, expiration_date
            FROM purchase_items
            WHERE purchase_id = $1
            ORDER BY id
            "#,
        )
        .bind(purchase_id)
        .fetch_all(&self.db)
        .await?;

        Ok(PurchaseWithItems { purchase, items })
    }

    /// List purchase headers, newest first
    pub async fn list(&self) -> AppResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, supplier_id, staff_id, approved_by, purchase_date, status,
                   total_amount, notes, created_at
            FROM purchases
            ORDER BY purchase_date DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(purchases)
    }

    /// Insert validated lines and apply their stock increments.
    async fn apply_lines(
        tx: &mut Transaction<'_, Postgres>,
        purchase_id: Uuid,
        purchase_date: NaiveDate,
        lines: &[PurchaseLine],
    ) -> AppResult<Vec<PurchaseItem>> {
        let mut items = Vec::with_capacity(lines.len());

        for line in lines {
            StockLedger::adjust(tx, line.ingredient_id, line.quantity).await?;

            sqlx::query("UPDATE ingredients SET last_restock_date = $1 WHERE id = $2")
                .bind(purchase_date)
                .bind(line.ingredient_id)
                .execute(&mut **tx)
                .await?;

            let item = sqlx::query_as::<_, PurchaseItem>(
                r#"
                INSERT INTO purchase_items (purchase_id, ingredient_id, quantity, unit_price, subtotal, expiration_date)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, purchase_id, ingredient_id, quantity, unit_price, subtotal, expiration_date
                "#,
            )
            .bind(purchase_id)
            .bind(line.ingredient_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.subtotal)
            .bind(line.expiration_date)
            .fetch_one(&mut **tx)
            .await?;

            items.push(item);
        }

        Ok(items)
    }

    /// Undo the stock effect of every existing line of a purchase.
    async fn reverse_lines(
        tx: &mut Transaction<'_, Postgres>,
        purchase_id: Uuid,
    ) -> AppResult<()> {
        let existing = sqlx::query_as::<_, (Uuid, Decimal)>(
            "SELECT ingredient_id, quantity FROM purchase_items WHERE purchase_id = $1",
        )
        .bind(purchase_id)
        .fetch_all(&mut **tx)
        .await?;

        for (ingredient_id, quantity) in existing {
            StockLedger::adjust(tx, ingredient_id, -quantity).await?;
        }

        Ok(())
    }

    async fn ensure_supplier_exists(&self, supplier_id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)")
                .bind(supplier_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Supplier".to_string()));
        }
        Ok(())
    }

    async fn ensure_staff_exists(&self, staff_id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM staff WHERE id = $1)")
                .bind(staff_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Staff".to_string()));
        }
        Ok(())
    }
}
