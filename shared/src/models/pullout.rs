//! Pullout request models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

/// Request body for creating a pullout.
///
/// Creation only records the request; stock is untouched until approval.
#[derive(Debug, Clone, Deserialize)]
pub struct PulloutRequest {
    pub ingredient_id: Uuid,
    pub staff_id: Uuid,
    pub manager_id: Option<Uuid>,
    pub quantity: Decimal,
    pub reason: String,
    #[serde(alias = "pullout_date")]
    pub date: Option<NaiveDate>,
}

/// Request body for editing a pending pullout; absent fields keep their
/// current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PulloutUpdate {
    pub ingredient_id: Option<Uuid>,
    pub quantity: Option<Decimal>,
    pub reason: Option<String>,
    #[serde(alias = "pullout_date")]
    pub date: Option<NaiveDate>,
}
