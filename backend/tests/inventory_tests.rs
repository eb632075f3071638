//! Low-stock classification tests
//!
//! The classifier is stateless and recomputed on every read; equality with
//! the reorder level counts as low stock.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{stock_status, StockStatus};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Quantity above the reorder level is in stock
    #[test]
    fn test_above_reorder_level() {
        assert_eq!(stock_status(dec("10"), Some(dec("5"))), StockStatus::InStock);
    }

    /// Quantity below the reorder level is low stock
    #[test]
    fn test_below_reorder_level() {
        assert_eq!(stock_status(dec("2"), Some(dec("5"))), StockStatus::LowStock);
    }

    /// Quantity equal to the reorder level is low stock, not in stock
    #[test]
    fn test_boundary_equality_is_low() {
        assert_eq!(stock_status(dec("5"), Some(dec("5"))), StockStatus::LowStock);
    }

    /// A missing reorder level defaults to zero
    #[test]
    fn test_missing_reorder_level_defaults_to_zero() {
        assert_eq!(stock_status(dec("1"), None), StockStatus::InStock);
        assert_eq!(stock_status(Decimal::ZERO, None), StockStatus::LowStock);
    }

    /// Display labels match the badge copy
    #[test]
    fn test_status_labels() {
        assert_eq!(StockStatus::LowStock.as_str(), "Low Stock");
        assert_eq!(StockStatus::InStock.as_str(), "In Stock");
    }

    /// Crossing the threshold flips the status immediately, both ways
    #[test]
    fn test_no_hysteresis() {
        let reorder = Some(dec("5"));
        assert_eq!(stock_status(dec("6"), reorder), StockStatus::InStock);
        assert_eq!(stock_status(dec("5"), reorder), StockStatus::LowStock);
        assert_eq!(stock_status(dec("6"), reorder), StockStatus::InStock);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..1_000_000).prop_map(|n| Decimal::new(n, 3))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Low stock holds exactly when quantity <= reorder level
        #[test]
        fn prop_low_stock_iff_at_or_below_threshold(
            quantity in quantity_strategy(),
            reorder in quantity_strategy(),
        ) {
            let status = stock_status(quantity, Some(reorder));
            if quantity <= reorder {
                prop_assert_eq!(status, StockStatus::LowStock);
            } else {
                prop_assert_eq!(status, StockStatus::InStock);
            }
        }

        /// Without a reorder level only zero quantity is low
        #[test]
        fn prop_default_threshold_is_zero(quantity in quantity_strategy()) {
            let status = stock_status(quantity, None);
            if quantity <= Decimal::ZERO {
                prop_assert_eq!(status, StockStatus::LowStock);
            } else {
                prop_assert_eq!(status, StockStatus::InStock);
            }
        }

        /// The classifier is a pure function of its inputs
        #[test]
        fn prop_stateless(
            quantity in quantity_strategy(),
            reorder in proptest::option::of(quantity_strategy()),
        ) {
            prop_assert_eq!(
                stock_status(quantity, reorder),
                stock_status(quantity, reorder)
            );
        }
    }
}
