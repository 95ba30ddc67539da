//! Purchase order models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for creating or replacing a purchase order
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseRequest {
    pub supplier_id: Uuid,
    pub staff_id: Uuid,
    #[serde(alias = "date")]
    pub purchase_date: NaiveDate,
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<PurchaseLineInput>,
}

/// A raw purchase line as submitted by a client.
///
/// All value fields are optional so a row left entirely blank in a form can
/// be distinguished from one that was only partially filled in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseLineInput {
    pub ingredient_id: Option<Uuid>,
    pub quantity: Option<Decimal>,
    #[serde(alias = "price")]
    pub unit_price: Option<Decimal>,
    pub expiration_date: Option<NaiveDate>,
}

impl PurchaseLineInput {
    /// True when no value field was provided at all.
    pub fn is_blank(&self) -> bool {
        self.ingredient_id.is_none() && self.quantity.is_none() && self.unit_price.is_none()
    }
}

/// A validated purchase line with its derived subtotal
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PurchaseLine {
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub expiration_date: Option<NaiveDate>,
}
