//! Consignment models
//!
//! Consigned goods are tracked, not owned; none of these records ever
//! touch the ingredient stock ledger.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for creating or replacing a consignment
#[derive(Debug, Clone, Deserialize)]
pub struct ConsignmentRequest {
    pub supplier_id: Uuid,
    pub manager_id: Uuid,
    #[serde(alias = "receivedDate", alias = "received_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<ConsignmentLineInput>,
}

/// A raw consignment line as submitted by a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsignmentLineInput {
    pub item_id: Option<Uuid>,
    pub quantity: Option<Decimal>,
    #[serde(alias = "unit_price", alias = "price")]
    pub supplier_price: Option<Decimal>,
    pub production_date: Option<NaiveDate>,
}

impl ConsignmentLineInput {
    pub fn is_blank(&self) -> bool {
        self.item_id.is_none() && self.quantity.is_none() && self.supplier_price.is_none()
    }
}

/// A validated consignment line with its derived subtotal
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConsignmentLine {
    pub item_id: Uuid,
    pub quantity: Decimal,
    pub supplier_price: Decimal,
    pub subtotal: Decimal,
    pub production_date: Option<NaiveDate>,
}
