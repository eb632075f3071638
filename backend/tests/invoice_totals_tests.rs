//! Invoice total derivation tests
//!
//! Covers the financial model: aggregate-preferring derivation, fallback
//! summation over line arrays, idempotence, and the advance reduction
//! convention.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::{
    derive_totals, is_advance, ExtraKind, InvoiceDetail, InvoiceExtra, InvoiceLineItem,
    PaymentStatus,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn line_item(name: &str, quantity: &str, unit_price: &str) -> InvoiceLineItem {
    let quantity = dec(quantity);
    let unit_price = dec(unit_price);
    InvoiceLineItem {
        id: Uuid::new_v4(),
        inventory_item_id: None,
        item_name: name.to_string(),
        item_kind: None,
        quantity,
        unit_price,
        line_total: quantity * unit_price,
    }
}

fn extra(label: &str, kind: ExtraKind, amount: &str) -> InvoiceExtra {
    InvoiceExtra {
        id: Uuid::new_v4(),
        label: label.to_string(),
        kind,
        amount: dec(amount),
    }
}

fn detail(
    items: Vec<InvoiceLineItem>,
    charges: Vec<InvoiceExtra>,
    reductions: Vec<InvoiceExtra>,
) -> InvoiceDetail {
    InvoiceDetail {
        id: Uuid::new_v4(),
        invoice_no: "INV-2026-0001".to_string(),
        job_id: None,
        invoice_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        payment_status: PaymentStatus::Unpaid,
        payment_method: None,
        notes: None,
        items,
        charges,
        reductions,
        items_total: None,
        total_charges: None,
        total_deductions: None,
        final_total: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Server aggregates win over the line arrays when all are present
    #[test]
    fn test_aggregates_preferred_over_summation() {
        let mut d = detail(
            vec![line_item("Brake pads", "2", "400")],
            vec![extra("Disposal fee", ExtraKind::Charge, "100")],
            vec![],
        );
        // Aggregates deliberately disagree with the lines
        d.items_total = Some(dec("900"));
        d.total_charges = Some(dec("150"));
        d.total_deductions = Some(dec("50"));
        d.final_total = Some(dec("1000"));

        let totals = derive_totals(&d);
        assert_eq!(totals.items_total, dec("900"));
        assert_eq!(totals.charges_total, dec("150"));
        assert_eq!(totals.reductions_total, dec("50"));
        assert_eq!(totals.final_total, dec("1000"));
    }

    /// With no aggregates, totals come from summing the line arrays
    #[test]
    fn test_fallback_summation() {
        let d = detail(
            vec![
                line_item("Engine oil", "4", "200"),
                line_item("Oil filter", "1", "200"),
            ],
            vec![extra("Service charge", ExtraKind::Charge, "200")],
            vec![extra("advance", ExtraKind::Deduction, "50")],
        );

        let totals = derive_totals(&d);
        assert_eq!(totals.items_total, dec("1000"));
        assert_eq!(totals.charges_total, dec("200"));
        assert_eq!(totals.reductions_total, dec("50"));
        assert_eq!(totals.final_total, dec("1150"));
    }

    /// Removing the advance reduction recomputes the final total
    #[test]
    fn test_removing_reduction_recomputes() {
        let mut d = detail(
            vec![line_item("Labour", "1", "1000")],
            vec![extra("Service charge", ExtraKind::Charge, "200")],
            vec![extra("advance", ExtraKind::Deduction, "50")],
        );
        assert_eq!(derive_totals(&d).final_total, dec("1150"));

        d.reductions.clear();
        assert_eq!(derive_totals(&d).final_total, dec("1200"));
    }

    /// Zero items and zero charges is a pure-credit adjustment
    #[test]
    fn test_pure_credit_adjustment() {
        let d = detail(
            vec![],
            vec![],
            vec![extra("Goodwill credit", ExtraKind::Deduction, "300")],
        );

        let totals = derive_totals(&d);
        assert_eq!(totals.final_total, dec("-300"));
    }

    /// A partial response falls back per aggregate, not all-or-nothing
    #[test]
    fn test_per_field_fallback() {
        let mut d = detail(
            vec![line_item("Coolant", "2", "350")],
            vec![extra("Towing", ExtraKind::Charge, "500")],
            vec![],
        );
        d.items_total = Some(dec("700"));
        // total_charges, total_deductions and final_total absent

        let totals = derive_totals(&d);
        assert_eq!(totals.items_total, dec("700"));
        assert_eq!(totals.charges_total, dec("500"));
        assert_eq!(totals.reductions_total, Decimal::ZERO);
        assert_eq!(totals.final_total, dec("1200"));
    }

    /// The advance convention is a trimmed, case-insensitive label match
    #[test]
    fn test_advance_label_convention() {
        assert!(is_advance("advance"));
        assert!(is_advance("Advance"));
        assert!(is_advance("  ADVANCE  "));
        assert!(!is_advance("advance payment"));
        assert!(!is_advance("deposit"));
    }

    /// Advance received sums only the advance-labelled reductions
    #[test]
    fn test_advance_received() {
        let d = detail(
            vec![line_item("Labour", "1", "5000")],
            vec![],
            vec![
                extra("advance", ExtraKind::Deduction, "1000"),
                extra("Discount", ExtraKind::Deduction, "250"),
            ],
        );

        assert_eq!(d.advance_received(), dec("1000"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..1_000_000).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// With all aggregates present, derivation returns them exactly
        #[test]
        fn prop_aggregates_returned_exactly(
            items_total in amount_strategy(),
            charges in amount_strategy(),
            deductions in amount_strategy(),
        ) {
            let mut d = detail(vec![line_item("Part", "1", "999")], vec![], vec![]);
            d.items_total = Some(items_total);
            d.total_charges = Some(charges);
            d.total_deductions = Some(deductions);
            d.final_total = Some(items_total + charges - deductions);

            let totals = derive_totals(&d);
            prop_assert_eq!(totals.items_total, items_total);
            prop_assert_eq!(totals.charges_total, charges);
            prop_assert_eq!(totals.reductions_total, deductions);
            prop_assert_eq!(totals.final_total, items_total + charges - deductions);
        }

        /// With no aggregates, final total is the signed sum of the arrays
        #[test]
        fn prop_fallback_is_signed_sum(
            item_amounts in prop::collection::vec(amount_strategy(), 0..8),
            charge_amounts in prop::collection::vec(amount_strategy(), 0..5),
            reduction_amounts in prop::collection::vec(amount_strategy(), 0..5),
        ) {
            let items: Vec<_> = item_amounts
                .iter()
                .map(|a| {
                    let mut li = line_item("Part", "1", "0");
                    li.unit_price = *a;
                    li.line_total = *a;
                    li
                })
                .collect();
            let charges: Vec<_> = charge_amounts
                .iter()
                .map(|a| {
                    let mut e = extra("Charge", ExtraKind::Charge, "0");
                    e.amount = *a;
                    e
                })
                .collect();
            let reductions: Vec<_> = reduction_amounts
                .iter()
                .map(|a| {
                    let mut e = extra("Reduction", ExtraKind::Deduction, "0");
                    e.amount = *a;
                    e
                })
                .collect();

            let d = detail(items, charges, reductions);
            let totals = derive_totals(&d);

            let expected_items: Decimal = item_amounts.iter().copied().sum();
            let expected_charges: Decimal = charge_amounts.iter().copied().sum();
            let expected_reductions: Decimal = reduction_amounts.iter().copied().sum();

            prop_assert_eq!(totals.items_total, expected_items);
            prop_assert_eq!(totals.charges_total, expected_charges);
            prop_assert_eq!(totals.reductions_total, expected_reductions);
            prop_assert_eq!(
                totals.final_total,
                expected_items + expected_charges - expected_reductions
            );
        }

        /// Derivation is a pure function: computing twice yields the same result
        #[test]
        fn prop_idempotent(
            item_amount in amount_strategy(),
            charge_amount in amount_strategy(),
        ) {
            let d = detail(
                vec![{
                    let mut li = line_item("Part", "1", "0");
                    li.unit_price = item_amount;
                    li.line_total = item_amount;
                    li
                }],
                vec![{
                    let mut e = extra("Charge", ExtraKind::Charge, "0");
                    e.amount = charge_amount;
                    e
                }],
                vec![],
            );

            let first = derive_totals(&d);
            let second = derive_totals(&d);
            prop_assert_eq!(first, second);
        }
    }
}
