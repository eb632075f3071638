//! Invoice models and the financial derivation rules
//!
//! An invoice owes `items_total + charges_total - reductions_total`. Each
//! aggregate is preferred from the backend record when present (it may
//! carry rounding or business rules not visible here) and recomputed from
//! the line arrays only when absent.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ItemKind;

/// Payment status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unpaid" => Some(PaymentStatus::Unpaid),
            "partial" => Some(PaymentStatus::Partial),
            "paid" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

/// Whether an invoice extra raises or lowers the amount owed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraKind {
    Charge,
    Deduction,
}

impl ExtraKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtraKind::Charge => "charge",
            ExtraKind::Deduction => "deduction",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "charge" => Some(ExtraKind::Charge),
            "deduction" => Some(ExtraKind::Deduction),
            _ => None,
        }
    }
}

/// A billed line on an invoice. `line_total` is computed when the line is
/// written and trusted as given on read; it is never recomputed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub id: Uuid,
    pub inventory_item_id: Option<Uuid>,
    pub item_name: String,
    #[serde(rename = "type")]
    pub item_kind: Option<ItemKind>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// An extra line on an invoice: a charge (labour, fees) or a reduction
/// (discount, advance payment). `amount` is non-negative; the kind decides
/// the sign in the final total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceExtra {
    pub id: Uuid,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ExtraKind,
    pub amount: Decimal,
}

/// Full invoice detail as loaded for display or editing. The aggregate
/// fields are optional so a partial backend response never crashes the
/// derivation; see [`derive_totals`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub id: Uuid,
    pub invoice_no: String,
    pub job_id: Option<Uuid>,
    pub invoice_date: NaiveDate,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<InvoiceLineItem>,
    pub charges: Vec<InvoiceExtra>,
    pub reductions: Vec<InvoiceExtra>,
    pub items_total: Option<Decimal>,
    pub total_charges: Option<Decimal>,
    pub total_deductions: Option<Decimal>,
    pub final_total: Option<Decimal>,
}

/// Derived invoice totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub items_total: Decimal,
    pub charges_total: Decimal,
    pub reductions_total: Decimal,
    pub final_total: Decimal,
}

/// Derive the four invoice totals from a loaded detail.
///
/// Each aggregate falls back to summation of the corresponding lines only
/// when the stored value is absent. Pure and idempotent; an invoice with no
/// items and no charges legitimately yields `final_total =
/// -reductions_total` (a pure-credit adjustment).
pub fn derive_totals(detail: &InvoiceDetail) -> InvoiceTotals {
    let items_total = detail
        .items_total
        .unwrap_or_else(|| detail.items.iter().map(|i| i.line_total).sum());
    let charges_total = detail
        .total_charges
        .unwrap_or_else(|| detail.charges.iter().map(|c| c.amount).sum());
    let reductions_total = detail
        .total_deductions
        .unwrap_or_else(|| detail.reductions.iter().map(|r| r.amount).sum());
    let final_total = detail
        .final_total
        .unwrap_or(items_total + charges_total - reductions_total);

    InvoiceTotals {
        items_total,
        charges_total,
        reductions_total,
        final_total,
    }
}

/// Whether a reduction label means "advance received". The source data
/// carries this as a free-text label convention, so the case-insensitive
/// match is centralized here.
pub fn is_advance(label: &str) -> bool {
    label.trim().eq_ignore_ascii_case("advance")
}

impl InvoiceDetail {
    /// Sum of reductions labelled "advance", displayed separately from
    /// other reductions.
    pub fn advance_received(&self) -> Decimal {
        self.reductions
            .iter()
            .filter(|r| is_advance(&r.label))
            .map(|r| r.amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn extra(label: &str, kind: ExtraKind, amount: &str) -> InvoiceExtra {
        InvoiceExtra {
            id: Uuid::new_v4(),
            label: label.to_string(),
            kind,
            amount: dec(amount),
        }
    }

    fn bare_detail() -> InvoiceDetail {
        InvoiceDetail {
            id: Uuid::new_v4(),
            invoice_no: "INV-2025-0001".to_string(),
            job_id: None,
            invoice_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            notes: None,
            items: vec![],
            charges: vec![],
            reductions: vec![],
            items_total: None,
            total_charges: None,
            total_deductions: None,
            final_total: None,
        }
    }

    #[test]
    fn test_server_aggregates_preferred_over_lines() {
        let mut detail = bare_detail();
        // Aggregates disagree with the (empty) line arrays on purpose
        detail.items_total = Some(dec("1000"));
        detail.total_charges = Some(dec("200"));
        detail.total_deductions = Some(dec("50"));
        detail.final_total = Some(dec("1150"));

        let totals = derive_totals(&detail);
        assert_eq!(totals.final_total, dec("1150"));
        assert_eq!(totals.items_total, dec("1000"));
    }

    #[test]
    fn test_fallback_summation_when_aggregates_absent() {
        let mut detail = bare_detail();
        detail.charges = vec![extra("Labour", ExtraKind::Charge, "200")];
        detail.reductions = vec![extra("Discount", ExtraKind::Deduction, "50")];
        detail.items = vec![InvoiceLineItem {
            id: Uuid::new_v4(),
            inventory_item_id: None,
            item_name: "Oil filter".to_string(),
            item_kind: Some(ItemKind::Consumable),
            quantity: dec("2"),
            unit_price: dec("500"),
            line_total: dec("1000"),
        }];

        let totals = derive_totals(&detail);
        assert_eq!(totals.items_total, dec("1000"));
        assert_eq!(totals.charges_total, dec("200"));
        assert_eq!(totals.reductions_total, dec("50"));
        assert_eq!(totals.final_total, dec("1150"));
    }

    #[test]
    fn test_pure_credit_adjustment_accepted() {
        let mut detail = bare_detail();
        detail.reductions = vec![extra("advance", ExtraKind::Deduction, "300")];

        let totals = derive_totals(&detail);
        assert_eq!(totals.final_total, dec("-300"));
    }

    #[test]
    fn test_advance_label_match_is_case_insensitive() {
        assert!(is_advance("advance"));
        assert!(is_advance("Advance"));
        assert!(is_advance(" ADVANCE "));
        assert!(!is_advance("advance payment"));
    }

    #[test]
    fn test_advance_received_sums_only_advance_reductions() {
        let mut detail = bare_detail();
        detail.reductions = vec![
            extra("Advance", ExtraKind::Deduction, "300"),
            extra("Discount", ExtraKind::Deduction, "100"),
        ];
        assert_eq!(detail.advance_received(), dec("300"));
    }
}
