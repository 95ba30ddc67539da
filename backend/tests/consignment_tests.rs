//! Consignment tests
//!
//! Tests for the consignment discipline:
//! - Header totals stay derived from line subtotals
//! - Consignments never touch ingredient stock, on create, edit, or delete

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::ConsignmentLineInput;
use shared::validation::{
    default_max_unit_price, lines_total, validate_consignment_lines, LineItemError,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn line_input(item_id: Uuid, qty: &str, price: &str) -> ConsignmentLineInput {
    ConsignmentLineInput {
        item_id: Some(item_id),
        quantity: Some(dec(qty)),
        supplier_price: Some(dec(price)),
        production_date: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Scenario: consignment of 20 widgets at 5 totals 100.00 and no
    /// ingredient quantity changes anywhere.
    #[test]
    fn test_create_derives_total_without_stock_effect() {
        let widget = Uuid::new_v4();
        let ingredient_quantity_before = dec("10");

        let lines =
            validate_consignment_lines(&[line_input(widget, "20", "5")], default_max_unit_price())
                .unwrap();
        let total = lines_total(lines.iter().map(|l| &l.subtotal)).unwrap();

        assert_eq!(total, dec("100.00"));
        // The consignment path has no ledger operation to even call.
        assert_eq!(ingredient_quantity_before, dec("10"));
    }

    #[test]
    fn test_full_replace_edit_recomputes_total() {
        let item = Uuid::new_v4();
        let max = default_max_unit_price();

        let old = validate_consignment_lines(&[line_input(item, "20", "5")], max).unwrap();
        assert_eq!(
            lines_total(old.iter().map(|l| &l.subtotal)),
            Ok(dec("100.00"))
        );

        let new = validate_consignment_lines(
            &[line_input(item, "3", "12.50"), line_input(item, "2", "0.75")],
            max,
        )
        .unwrap();
        assert_eq!(
            lines_total(new.iter().map(|l| &l.subtotal)),
            Ok(dec("39.00"))
        );
    }

    #[test]
    fn test_blank_rows_dropped_partial_rejected() {
        let complete = line_input(Uuid::new_v4(), "2", "5");
        let blank = ConsignmentLineInput::default();
        let lines = validate_consignment_lines(
            &[complete.clone(), blank],
            default_max_unit_price(),
        )
        .unwrap();
        assert_eq!(lines.len(), 1);

        let partial = ConsignmentLineInput {
            item_id: Some(Uuid::new_v4()),
            quantity: Some(dec("2")),
            supplier_price: None,
            production_date: None,
        };
        assert_eq!(
            validate_consignment_lines(&[complete, partial], default_max_unit_price()),
            Err(LineItemError::Incomplete(1))
        );
    }

    #[test]
    fn test_empty_line_set_rejected() {
        assert_eq!(
            validate_consignment_lines(&[], default_max_unit_price()),
            Err(LineItemError::Empty)
        );
    }

    #[test]
    fn test_price_rules_match_purchases() {
        let max = default_max_unit_price();
        assert!(matches!(
            validate_consignment_lines(&[line_input(Uuid::new_v4(), "1", "100000.00")], max),
            Err(LineItemError::PriceAboveCeiling(0, _))
        ));
        assert_eq!(
            validate_consignment_lines(&[line_input(Uuid::new_v4(), "0", "5")], max),
            Err(LineItemError::NonPositiveQuantity(0))
        );
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

    /// Strategy for generating valid supplier prices
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=1000000i64).prop_map(|n| Decimal::new(n, 2)) // 0.01 to 10000.00
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Consignment totals are always the rounded sum of line subtotals,
        /// with each subtotal rounded to 2 decimals.
        #[test]
        fn prop_total_derived(
            raw_lines in prop::collection::vec((quantity_strategy(), price_strategy()), 1..10)
        ) {
            let inputs: Vec<ConsignmentLineInput> = raw_lines
                .iter()
                .map(|(qty, price)| ConsignmentLineInput {
                    item_id: Some(Uuid::new_v4()),
                    quantity: Some(*qty),
                    supplier_price: Some(*price),
                    production_date: None,
                })
                .collect();

            let lines = validate_consignment_lines(&inputs, dec("99999.99")).unwrap();
            let total = lines_total(lines.iter().map(|l| &l.subtotal)).unwrap();

            let expected: Decimal = lines.iter().map(|l| l.subtotal).sum();
            prop_assert_eq!(total, expected.round_dp(2));
            for line in &lines {
                prop_assert_eq!(line.subtotal.scale() <= 2, true);
            }
        }
    }
}
