//! Inventory charge resolver tests
//!
//! The add-charge flow: consumables pass through the deduction decision,
//! everything else finalizes directly; a failed deduction never produces a
//! charge.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::{ChargeError, ChargeResolver, InventoryItem, ItemKind};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(name: &str, kind: ItemKind, unit_cost: Option<&str>) -> InventoryItem {
    let now = Utc::now();
    InventoryItem {
        id: Uuid::new_v4(),
        name: name.to_string(),
        kind,
        quantity: dec("100"),
        unit_cost: unit_cost.map(dec),
        reorder_level: Some(dec("10")),
        created_at: now,
        updated_at: now,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Consumable, quantity 3 at unit cost 50: staged total 150, deduction
    /// prompt, then a finalized deducted charge labelled with the quantity
    #[test]
    fn test_consumable_deduct_and_add() {
        let resolver = ChargeResolver::new()
            .select(item("Oil filter", ItemKind::Consumable, Some("50")), dec("3"), None)
            .unwrap();

        let pending = resolver.pending().unwrap();
        assert_eq!(pending.line_total, dec("150"));
        assert_eq!(pending.rate, dec("50"));

        let resolver = resolver.confirm().unwrap();
        assert!(resolver.awaiting_deduction_decision());

        // Stock deduction succeeds, then and only then the charge appears
        let resolver = resolver.deduction_succeeded().unwrap();
        let charge = resolver.finalized().unwrap();
        assert_eq!(charge.label, "Oil filter (3×)");
        assert_eq!(charge.amount, dec("150"));
        assert_eq!(charge.quantity, dec("3"));
        assert!(charge.deducted);
    }

    /// Non-consumables skip the deduction prompt entirely
    #[test]
    fn test_non_consumable_finalizes_directly() {
        let resolver = ChargeResolver::new()
            .select(item("Scanner", ItemKind::NonConsumable, Some("500")), dec("1"), None)
            .unwrap()
            .confirm()
            .unwrap();

        let charge = resolver.finalized().unwrap();
        assert_eq!(charge.label, "Scanner");
        assert!(!charge.deducted);
    }

    /// Bulk items behave like non-consumables
    #[test]
    fn test_bulk_finalizes_directly() {
        let resolver = ChargeResolver::new()
            .select(item("Grease", ItemKind::Bulk, Some("20")), dec("2"), None)
            .unwrap()
            .confirm()
            .unwrap();

        let charge = resolver.finalized().unwrap();
        assert!(!charge.deducted);
    }

    /// A failed deduction keeps the machine at the decision point and no
    /// charge exists
    #[test]
    fn test_deduction_failure_keeps_state() {
        let resolver = ChargeResolver::new()
            .select(item("Coolant", ItemKind::Consumable, Some("350")), dec("2"), None)
            .unwrap()
            .confirm()
            .unwrap()
            .deduction_failed()
            .unwrap();

        assert!(resolver.awaiting_deduction_decision());
        assert!(resolver.finalized().is_none());

        // The operator can still add without deduction afterwards
        let resolver = resolver.add_without_deduction().unwrap();
        let charge = resolver.finalized().unwrap();
        assert!(!charge.deducted);
    }

    /// Back discards the decision and returns to selection
    #[test]
    fn test_back_returns_to_selecting() {
        let resolver = ChargeResolver::new()
            .select(item("Brake fluid", ItemKind::Consumable, Some("150")), dec("1"), None)
            .unwrap()
            .confirm()
            .unwrap()
            .back()
            .unwrap();

        assert!(!resolver.awaiting_deduction_decision());
        assert!(resolver.pending().is_some());
    }

    /// An explicit rate overrides the item's unit cost
    #[test]
    fn test_explicit_rate_overrides_unit_cost() {
        let resolver = ChargeResolver::new()
            .select(
                item("Engine oil", ItemKind::Consumable, Some("200")),
                dec("4"),
                Some(dec("250")),
            )
            .unwrap();

        let pending = resolver.pending().unwrap();
        assert_eq!(pending.rate, dec("250"));
        assert_eq!(pending.line_total, dec("1000"));
    }

    /// No rate anywhere is a staging error
    #[test]
    fn test_missing_rate_rejected() {
        let result =
            ChargeResolver::new().select(item("Unpriced", ItemKind::Consumable, None), dec("1"), None);
        assert_eq!(result.unwrap_err(), ChargeError::MissingRate);
    }

    /// Zero and negative quantities are rejected at staging
    #[test]
    fn test_non_positive_quantity_rejected() {
        let result = ChargeResolver::new().select(
            item("Oil filter", ItemKind::Consumable, Some("50")),
            Decimal::ZERO,
            None,
        );
        assert_eq!(result.unwrap_err(), ChargeError::NonPositiveQuantity);
    }

    /// Quantity one omits the quantity suffix in the label
    #[test]
    fn test_label_quantity_one() {
        let resolver = ChargeResolver::new()
            .select(item("Air filter", ItemKind::Consumable, Some("80")), dec("1"), None)
            .unwrap();

        assert_eq!(resolver.pending().unwrap().label, "Air filter");
    }

    /// Finalization can only follow a confirmed selection
    #[test]
    fn test_confirm_requires_selecting() {
        let result = ChargeResolver::new().confirm();
        assert!(matches!(result, Err(ChargeError::InvalidTransition(_))));
    }

    /// A deducted charge keeps the item reference and the quantity that
    /// left stock, so deleting the invoice can put it back
    #[test]
    fn test_deducted_charge_carries_restore_provenance() {
        let oil = item("Engine oil", ItemKind::Consumable, Some("200"));
        let oil_id = oil.id;

        let resolver = ChargeResolver::new()
            .select(oil, dec("5"), None)
            .unwrap()
            .confirm()
            .unwrap()
            .deduction_succeeded()
            .unwrap();

        let charge = resolver.finalized().unwrap();
        assert!(charge.deducted);
        assert_eq!(charge.inventory_item_id, oil_id);
        assert_eq!(charge.quantity, dec("5"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1000).prop_map(Decimal::from)
    }

    fn rate_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..100_000).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The staged amount is always quantity times rate
        #[test]
        fn prop_amount_is_quantity_times_rate(
            quantity in quantity_strategy(),
            rate in rate_strategy(),
        ) {
            let resolver = ChargeResolver::new()
                .select(
                    item("Part", ItemKind::Consumable, None),
                    quantity,
                    Some(rate),
                )
                .unwrap();

            prop_assert_eq!(resolver.pending().unwrap().line_total, quantity * rate);
        }

        /// Consumables always pass through the deduction decision; other
        /// kinds never do
        #[test]
        fn prop_only_consumables_prompt(
            quantity in quantity_strategy(),
            kind_idx in 0usize..3,
        ) {
            let kind = [ItemKind::Consumable, ItemKind::NonConsumable, ItemKind::Bulk][kind_idx];
            let resolver = ChargeResolver::new()
                .select(item("Part", kind, Some("50")), quantity, None)
                .unwrap()
                .confirm()
                .unwrap();

            if kind == ItemKind::Consumable {
                prop_assert!(resolver.awaiting_deduction_decision());
            } else {
                let charge = resolver.finalized().unwrap();
                prop_assert!(!charge.deducted);
            }
        }

        /// Labels carry the quantity suffix exactly when quantity > 1
        #[test]
        fn prop_label_quantity_suffix(quantity in quantity_strategy()) {
            let resolver = ChargeResolver::new()
                .select(item("Part", ItemKind::Consumable, Some("50")), quantity, None)
                .unwrap();

            let label = &resolver.pending().unwrap().label;
            if quantity > Decimal::ONE {
                prop_assert_eq!(label, &format!("Part ({}×)", quantity));
            } else {
                prop_assert_eq!(label, "Part");
            }
        }
    }
}
