//! Purchase order tests
//!
//! Tests for the purchase transaction discipline:
//! - Header totals stay derived from line subtotals
//! - Edit reverses every old line before applying the new set
//! - Delete is the exact inverse of create
//! - Stock never goes negative across purchase operations

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::{PurchaseLine, PurchaseLineInput};
use shared::validation::{
    default_max_unit_price, line_subtotal, lines_total, validate_purchase_lines, LineItemError,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn line_input(ingredient_id: Uuid, qty: &str, price: &str) -> PurchaseLineInput {
    PurchaseLineInput {
        ingredient_id: Some(ingredient_id),
        quantity: Some(dec(qty)),
        unit_price: Some(dec(price)),
        expiration_date: None,
    }
}

/// In-memory model of the stock ledger, mirroring the per-line
/// increment/reversal sequence the purchase service performs.
struct StockModel {
    quantities: HashMap<Uuid, Decimal>,
}

impl StockModel {
    fn new() -> Self {
        Self {
            quantities: HashMap::new(),
        }
    }

    fn set(&mut self, ingredient_id: Uuid, qty: &str) {
        self.quantities.insert(ingredient_id, dec(qty));
    }

    fn get(&self, ingredient_id: Uuid) -> Decimal {
        *self.quantities.get(&ingredient_id).unwrap()
    }

    fn apply(&mut self, lines: &[PurchaseLine]) {
        for line in lines {
            *self.quantities.entry(line.ingredient_id).or_default() += line.quantity;
        }
    }

    fn reverse(&mut self, lines: &[PurchaseLine]) {
        for line in lines {
            *self.quantities.entry(line.ingredient_id).or_default() -= line.quantity;
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Scenario: Coffee Beans qty=10, purchase 5 at 450.
    #[test]
    fn test_create_increments_stock_and_derives_total() {
        let coffee = Uuid::new_v4();
        let mut stock = StockModel::new();
        stock.set(coffee, "10");

        let lines =
            validate_purchase_lines(&[line_input(coffee, "5", "450")], default_max_unit_price())
                .unwrap();
        let total = lines_total(lines.iter().map(|l| &l.subtotal)).unwrap();

        stock.apply(&lines);

        assert_eq!(total, dec("2250.00"));
        assert_eq!(stock.get(coffee), dec("15"));
    }

    /// Scenario: edit the purchase down to qty 3. Reverse 5, apply 3.
    #[test]
    fn test_edit_reverses_then_reapplies() {
        let coffee = Uuid::new_v4();
        let mut stock = StockModel::new();
        stock.set(coffee, "10");

        let max = default_max_unit_price();
        let old_lines =
            validate_purchase_lines(&[line_input(coffee, "5", "450")], max).unwrap();
        stock.apply(&old_lines);

        let new_lines =
            validate_purchase_lines(&[line_input(coffee, "3", "450")], max).unwrap();
        stock.reverse(&old_lines);
        stock.apply(&new_lines);

        let total = lines_total(new_lines.iter().map(|l| &l.subtotal)).unwrap();
        assert_eq!(stock.get(coffee), dec("13"));
        assert_eq!(total, dec("1350.00"));
    }

    /// Scenario: delete restores the pre-create quantity.
    #[test]
    fn test_delete_is_inverse_of_create() {
        let coffee = Uuid::new_v4();
        let mut stock = StockModel::new();
        stock.set(coffee, "10");

        let lines =
            validate_purchase_lines(&[line_input(coffee, "5", "450")], default_max_unit_price())
                .unwrap();
        stock.apply(&lines);
        stock.reverse(&lines);

        assert_eq!(stock.get(coffee), dec("10"));
    }

    /// An edit that swaps to a disjoint ingredient set must reverse all old
    /// lines, or total system stock drifts.
    #[test]
    fn test_edit_with_disjoint_ingredient_set() {
        let beans = Uuid::new_v4();
        let milk = Uuid::new_v4();
        let mut stock = StockModel::new();
        stock.set(beans, "10");
        stock.set(milk, "4");

        let max = default_max_unit_price();
        let old_lines = validate_purchase_lines(&[line_input(beans, "5", "450")], max).unwrap();
        stock.apply(&old_lines);

        let new_lines = validate_purchase_lines(&[line_input(milk, "2", "80")], max).unwrap();
        stock.reverse(&old_lines);
        stock.apply(&new_lines);

        assert_eq!(stock.get(beans), dec("10"));
        assert_eq!(stock.get(milk), dec("6"));
    }

    /// Subtotals round to 2 decimals before the total is summed.
    #[test]
    fn test_subtotal_and_total_rounding() {
        assert_eq!(line_subtotal(dec("3"), dec("1.115")), Some(dec("3.35")));

        let ids = [Uuid::new_v4(), Uuid::new_v4()];
        let lines = validate_purchase_lines(
            &[
                line_input(ids[0], "3", "1.115"),
                line_input(ids[1], "1", "0.01"),
            ],
            default_max_unit_price(),
        )
        .unwrap();
        assert_eq!(
            lines_total(lines.iter().map(|l| &l.subtotal)),
            Ok(dec("3.36"))
        );
    }

    /// An absurdly large quantity must fail validation cleanly instead of
    /// overflowing the subtotal arithmetic.
    #[test]
    fn test_oversized_quantity_rejected_without_overflow() {
        let huge = line_input(
            Uuid::new_v4(),
            "79000000000000000000000000000",
            "99999.99",
        );
        assert_eq!(
            validate_purchase_lines(&[huge], default_max_unit_price()),
            Err(LineItemError::ValueOutOfRange(0))
        );
    }

    #[test]
    fn test_partially_filled_line_rejected() {
        let partial = PurchaseLineInput {
            ingredient_id: Some(Uuid::new_v4()),
            quantity: None,
            unit_price: Some(dec("10")),
            expiration_date: None,
        };
        assert_eq!(
            validate_purchase_lines(&[partial], default_max_unit_price()),
            Err(LineItemError::Incomplete(0))
        );
    }

    #[test]
    fn test_empty_line_set_rejected() {
        assert_eq!(
            validate_purchase_lines(&[], default_max_unit_price()),
            Err(LineItemError::Empty)
        );
    }

    #[test]
    fn test_price_ceiling() {
        let over = line_input(Uuid::new_v4(), "1", "100000.00");
        assert!(matches!(
            validate_purchase_lines(&[over], default_max_unit_price()),
            Err(LineItemError::PriceAboveCeiling(0, _))
        ));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating valid quantities (positive decimals)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1)) // 0.1 to 1000.0
    }

    /// Strategy for generating valid unit prices
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=1000000i64).prop_map(|n| Decimal::new(n, 2)) // 0.01 to 10000.00
    }

    fn lines_strategy() -> impl Strategy<Value = Vec<(Decimal, Decimal)>> {
        prop::collection::vec((quantity_strategy(), price_strategy()), 1..10)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Header total always equals the rounded sum of line subtotals.
        #[test]
        fn prop_total_is_derived_from_subtotals(raw_lines in lines_strategy()) {
            let inputs: Vec<PurchaseLineInput> = raw_lines
                .iter()
                .map(|(qty, price)| PurchaseLineInput {
                    ingredient_id: Some(Uuid::new_v4()),
                    quantity: Some(*qty),
                    unit_price: Some(*price),
                    expiration_date: None,
                })
                .collect();

            let lines = validate_purchase_lines(&inputs, dec("99999.99")).unwrap();
            let total = lines_total(lines.iter().map(|l| &l.subtotal)).unwrap();

            let expected: Decimal = lines.iter().map(|l| l.subtotal).sum();
            prop_assert_eq!(total, expected.round_dp(2));

            for line in &lines {
                prop_assert_eq!(
                    Some(line.subtotal),
                    line_subtotal(line.quantity, line.unit_price)
                );
            }
        }

        /// Editing a purchase to the identical line set is delta-neutral.
        #[test]
        fn prop_noop_edit_is_delta_neutral(
            raw_lines in lines_strategy(),
            initial in quantity_strategy()
        ) {
            let ingredient = Uuid::new_v4();
            let inputs: Vec<PurchaseLineInput> = raw_lines
                .iter()
                .map(|(qty, price)| PurchaseLineInput {
                    ingredient_id: Some(ingredient),
                    quantity: Some(*qty),
                    unit_price: Some(*price),
                    expiration_date: None,
                })
                .collect();
            let lines = validate_purchase_lines(&inputs, dec("99999.99")).unwrap();

            let mut stock = StockModel::new();
            stock.quantities.insert(ingredient, initial);

            stock.apply(&lines);
            // Edit with identical lines: reverse old, apply new
            stock.reverse(&lines);
            stock.apply(&lines);
            prop_assert_eq!(stock.get(ingredient), initial + lines.iter().map(|l| l.quantity).sum::<Decimal>());

            // And delete afterwards restores the original quantity
            stock.reverse(&lines);
            prop_assert_eq!(stock.get(ingredient), initial);
        }

        /// Create followed by delete never leaves stock below its starting
        /// point, for any starting quantity.
        #[test]
        fn prop_create_delete_roundtrip_never_negative(
            raw_lines in lines_strategy(),
            initial in quantity_strategy()
        ) {
            let ingredient = Uuid::new_v4();
            let inputs: Vec<PurchaseLineInput> = raw_lines
                .iter()
                .map(|(qty, price)| PurchaseLineInput {
                    ingredient_id: Some(ingredient),
                    quantity: Some(*qty),
                    unit_price: Some(*price),
                    expiration_date: None,
                })
                .collect();
            let lines = validate_purchase_lines(&inputs, dec("99999.99")).unwrap();

            let mut stock = StockModel::new();
            stock.quantities.insert(ingredient, initial);

            stock.apply(&lines);
            prop_assert!(stock.get(ingredient) >= Decimal::ZERO);
            stock.reverse(&lines);
            prop_assert_eq!(stock.get(ingredient), initial);
        }
    }
}
