//! Validation utilities for the TrackNToms POS inventory core
//!
//! Line-item rules and money rounding live here so the backend services and
//! the test suite agree on one definition of "valid" and "total".

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::models::{ConsignmentLine, ConsignmentLineInput, PurchaseLine, PurchaseLineInput};

/// Default ceiling for a single unit price, overridable via configuration.
pub fn default_max_unit_price() -> Decimal {
    // 99999.99
    Decimal::new(9_999_999, 2)
}

/// Largest amount the NUMERIC(12, 2) money and quantity columns hold.
pub fn max_money_amount() -> Decimal {
    // 9999999999.99
    Decimal::new(999_999_999_999, 2)
}

/// Round a monetary amount to 2 decimal places, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Subtotal for one line: `quantity * unit_price`, rounded to 2 decimals.
/// `None` when the product overflows `Decimal`.
pub fn line_subtotal(quantity: Decimal, unit_price: Decimal) -> Option<Decimal> {
    quantity.checked_mul(unit_price).map(round_money)
}

/// Header total: sum of already-rounded subtotals, rounded to 2 decimals.
/// Fails when the sum overflows or exceeds what the total column holds.
pub fn lines_total<'a>(
    subtotals: impl IntoIterator<Item = &'a Decimal>,
) -> Result<Decimal, LineItemError> {
    let mut total = Decimal::ZERO;
    for subtotal in subtotals {
        total = total
            .checked_add(*subtotal)
            .ok_or(LineItemError::TotalOutOfRange)?;
    }
    if total > max_money_amount() {
        return Err(LineItemError::TotalOutOfRange);
    }
    Ok(round_money(total))
}

/// Why a submitted line-item set was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineItemError {
    #[error("at least one complete line item is required")]
    Empty,

    #[error("line item {0} is partially filled; provide all fields or leave the row blank")]
    Incomplete(usize),

    #[error("line item {0}: quantity must be positive")]
    NonPositiveQuantity(usize),

    #[error("line item {0}: unit price must be positive")]
    NonPositivePrice(usize),

    #[error("line item {0}: unit price exceeds the maximum of {1}")]
    PriceAboveCeiling(usize, Decimal),

    #[error("line item {0}: amount exceeds the supported range")]
    ValueOutOfRange(usize),

    #[error("total exceeds the supported range")]
    TotalOutOfRange,
}

impl LineItemError {
    /// The request field the error refers to, for structured error bodies.
    pub fn field(&self) -> &'static str {
        match self {
            LineItemError::Empty
            | LineItemError::Incomplete(_)
            | LineItemError::ValueOutOfRange(_)
            | LineItemError::TotalOutOfRange => "items",
            LineItemError::NonPositiveQuantity(_) => "items.quantity",
            LineItemError::NonPositivePrice(_) | LineItemError::PriceAboveCeiling(_, _) => {
                "items.unit_price"
            }
        }
    }
}

/// Validate submitted purchase lines and derive their subtotals.
///
/// Blank rows are dropped, partially-filled rows are rejected, and the
/// surviving set must be non-empty.
pub fn validate_purchase_lines(
    items: &[PurchaseLineInput],
    max_unit_price: Decimal,
) -> Result<Vec<PurchaseLine>, LineItemError> {
    let mut lines = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        if item.is_blank() {
            continue;
        }
        let (Some(ingredient_id), Some(quantity), Some(unit_price)) =
            (item.ingredient_id, item.quantity, item.unit_price)
        else {
            return Err(LineItemError::Incomplete(index));
        };

        check_line_values(index, quantity, unit_price, max_unit_price)?;
        let subtotal = checked_subtotal(index, quantity, unit_price)?;

        lines.push(PurchaseLine {
            ingredient_id,
            quantity,
            unit_price,
            subtotal,
            expiration_date: item.expiration_date,
        });
    }

    if lines.is_empty() {
        return Err(LineItemError::Empty);
    }
    Ok(lines)
}

/// Validate submitted consignment lines and derive their subtotals.
pub fn validate_consignment_lines(
    items: &[ConsignmentLineInput],
    max_unit_price: Decimal,
) -> Result<Vec<ConsignmentLine>, LineItemError> {
    let mut lines = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        if item.is_blank() {
            continue;
        }
        let (Some(item_id), Some(quantity), Some(supplier_price)) =
            (item.item_id, item.quantity, item.supplier_price)
        else {
            return Err(LineItemError::Incomplete(index));
        };

        check_line_values(index, quantity, supplier_price, max_unit_price)?;
        let subtotal = checked_subtotal(index, quantity, supplier_price)?;

        lines.push(ConsignmentLine {
            item_id,
            quantity,
            supplier_price,
            subtotal,
            production_date: item.production_date,
        });
    }

    if lines.is_empty() {
        return Err(LineItemError::Empty);
    }
    Ok(lines)
}

fn check_line_values(
    index: usize,
    quantity: Decimal,
    unit_price: Decimal,
    max_unit_price: Decimal,
) -> Result<(), LineItemError> {
    if quantity <= Decimal::ZERO {
        return Err(LineItemError::NonPositiveQuantity(index));
    }
    if quantity > max_money_amount() {
        return Err(LineItemError::ValueOutOfRange(index));
    }
    if unit_price <= Decimal::ZERO {
        return Err(LineItemError::NonPositivePrice(index));
    }
    if unit_price > max_unit_price {
        return Err(LineItemError::PriceAboveCeiling(index, max_unit_price));
    }
    Ok(())
}

/// Derive one line's subtotal, rejecting values the money columns cannot
/// represent instead of letting the arithmetic overflow.
fn checked_subtotal(
    index: usize,
    quantity: Decimal,
    unit_price: Decimal,
) -> Result<Decimal, LineItemError> {
    line_subtotal(quantity, unit_price)
        .filter(|subtotal| *subtotal <= max_money_amount())
        .ok_or(LineItemError::ValueOutOfRange(index))
}

/// Validate a pullout request quantity.
pub fn validate_pullout_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a pullout reason (required, non-blank).
pub fn validate_pullout_reason(reason: &str) -> Result<(), &'static str> {
    if reason.trim().is_empty() {
        return Err("Reason is required");
    }
    Ok(())
}
