//! Consignment service
//!
//! Externally-supplied goods received on consignment: header + line items
//! written atomically with a derived total, exactly like purchases, except
//! that consigned goods are tracked rather than owned. Nothing in this
//! service touches the stock ledger, including delete.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::models::{ConsignmentLine, ConsignmentRequest};
use shared::validation::{lines_total, validate_consignment_lines};

use crate::error::{AppError, AppResult};

/// Service for consignment transactions
#[derive(Clone)]
pub struct ConsignmentService {
    db: PgPool,
    max_unit_price: Decimal,
}

/// A consignment header
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Consignment {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub manager_id: Uuid,
    pub consignment_date: NaiveDate,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A persisted consignment line item
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ConsignmentItem {
    pub id: Uuid,
    pub consignment_id: Uuid,
    pub item_id: Uuid,
    pub quantity: Decimal,
    pub supplier_price: Decimal,
    pub subtotal: Decimal,
    pub production_date: Option<NaiveDate>,
}

/// A consignment with its line items
#[derive(Debug, Serialize)]
pub struct ConsignmentWithItems {
    #[serde(flatten)]
    pub consignment: Consignment,
    pub items: Vec<ConsignmentItem>,
}

impl ConsignmentService {
    pub fn new(db: PgPool, max_unit_price: Decimal) -> Self {
        Self { db, max_unit_price }
    }

    /// Create a consignment: header and lines as one atomic unit, total
    /// derived from line subtotals. Inventory levels are untouched.
    pub async fn create(&self, input: ConsignmentRequest) -> AppResult<ConsignmentWithItems> {
        let lines = validate_consignment_lines(&input.items, self.max_unit_price)?;
        let total = lines_total(lines.iter().map(|l| &l.subtotal))?;

        self.ensure_supplier_exists(input.supplier_id).await?;
        self.ensure_staff_exists(input.manager_id).await?;

        let mut tx = self.db.begin().await?;

        let consignment = sqlx::query_as::<_, Consignment>(
            r#"
            INSERT INTO consignments (supplier_id, manager_id, consignment_date, total)
            VALUES ($1, $2, $3, $4)
            RETURNING id, supplier_id, manager_id, consignment_date, total, created_at
            "#,
        )
        .bind(input.supplier_id)
        .bind(input.manager_id)
        .bind(input.date)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        let items = Self::insert_lines(&mut tx, consignment.id, &lines).await?;

        tx.commit().await?;

        tracing::info!(consignment_id = %consignment.id, total = %total, "consignment created");

        Ok(ConsignmentWithItems { consignment, items })
    }

    /// Full-replace edit: delete the existing lines, insert the new set,
    /// and recompute the header total, atomically.
    pub async fn update(
        &self,
        consignment_id: Uuid,
        input: ConsignmentRequest,
    ) -> AppResult<ConsignmentWithItems> {
        let lines = validate_consignment_lines(&input.items, self.max_unit_price)?;
        let total = lines_total(lines.iter().map(|l| &l.subtotal))?;

        self.ensure_supplier_exists(input.supplier_id).await?;
        self.ensure_staff_exists(input.manager_id).await?;

        let mut tx = self.db.begin().await?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM consignments WHERE id = $1 FOR UPDATE")
            .bind(consignment_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Consignment".to_string()))?;

        sqlx::query("DELETE FROM consignment_items WHERE consignment_id = $1")
            .bind(consignment_id)
            .execute(&mut *tx)
            .await?;

        let items = Self::insert_lines(&mut tx, consignment_id, &lines).await?;

        let consignment = sqlx::query_as::<_, Consignment>(
            r#"
            UPDATE consignments
            SET supplier_id = $1, manager_id = $2, consignment_date = $3, total = $4
            WHERE id = $5
            RETURNING id, supplier_id, manager_id, consignment_date, total, created_at
            "#,
        )
        .bind(input.supplier_id)
        .bind(input.manager_id)
        .bind(input.date)
        .bind(total)
        .bind(consignment_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ConsignmentWithItems { consignment, items })
    }

    /// Delete a consignment and its lines. This only removes the record;
    /// inventory levels are not adjusted.
    pub async fn delete(&self, consignment_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM consignments WHERE id = $1 FOR UPDATE")
            .bind(consignment_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Consignment".to_string()))?;

        sqlx::query("DELETE FROM consignment_items WHERE consignment_id = $1")
            .bind(consignment_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM consignments WHERE id = $1")
            .bind(consignment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(consignment_id = %consignment_id, "consignment deleted");

        Ok(())
    }

    /// Get a consignment with its line items
    pub async fn get(&self, consignment_id: Uuid) -> AppResult<ConsignmentWithItems> {
        let consignment = sqlx::query_as::<_, Consignment>(
            r#"
            SELECT id, supplier_id, manager_id, consignment_date, total, created_at
            FROM consignments
            WHERE id = $1
            "#,
        )
        .bind(consignment_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Consignment".to_string()))?;

        let items = sqlx::query_as::<_, ConsignmentItem>(
            r#"
            SELECT id, consignment_id, item_id, quantity, supplier_price, subtotal, production_date
            FROM consignment_items
            WHERE consignment_id = $1
            ORDER BY id
            "#,
        )
        .bind(consignment_id)
        .fetch_all(&self.db)
        .await?;

        Ok(ConsignmentWithItems { consignment, items })
    }

    /// List consignment headers, newest first
    pub async fn list(&self) -> AppResult<Vec<Consignment>> {
        let consignments = sqlx::query_as::<_, Consignment>(
            r#"
            SELECT id, supplier_id, manager_id, consignment_date, total, created_at
            FROM consignments
            ORDER BY consignment_date DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(consignments)
    }

    async fn insert_lines(
        tx: &mut Transaction<'_, Postgres>,
        consignment_id: Uuid,
        lines: &[ConsignmentLine],
    ) -> AppResult<Vec<ConsignmentItem>> {
        let mut items = Vec::with_capacity(lines.len());

        for line in lines {
            let item_exists =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM items WHERE id = $1)")
                    .bind(line.item_id)
                    .fetch_one(&mut **tx)
                    .await?;

            if !item_exists {
                return Err(AppError::NotFound("Item".to_string()));
            }

            let item = sqlx::query_as::<_, ConsignmentItem>(
                r#"
                INSERT INTO consignment_items (consignment_id, item_id, quantity, supplier_price, subtotal, production_date)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, consignment_id, item_id, quantity, supplier_price, subtotal, production_date
                "#,
            )
            .bind(consignment_id)
            .bind(line.item_id)
            .bind(line.quantity)
            .bind(line.supplier_price)
            .bind(line.subtotal)
            .bind(line.production_date)
            .fetch_one(&mut **tx)
            .await?;

            items.push(item);
        }

        Ok(items)
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
