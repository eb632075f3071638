//! Inventory charge resolver
//!
//! Adding an inventory item as an invoice charge is a small state machine:
//! `Idle -> Selecting -> AwaitingDeductionDecision -> Finalized`. Only
//! consumable items reach the deduction decision; non-consumable and bulk
//! items finalize directly without touching stock. A failed stock deduction
//! keeps the machine waiting, so a charge can never be appended after a
//! deduction that did not happen.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::InventoryItem;

/// Errors raised while staging or driving an add-charge flow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChargeError {
    #[error("quantity must be positive")]
    NonPositiveQuantity,

    #[error("no rate given and item has no unit cost")]
    MissingRate,

    #[error("invalid transition: {0}")]
    InvalidTransition(&'static str),
}

/// A staged charge, held only while the operator decides whether this use
/// consumes real stock. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCharge {
    pub item: InventoryItem,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub label: String,
    pub line_total: Decimal,
}

impl PendingCharge {
    /// Stage a charge for an inventory item. A blank rate falls back to the
    /// item's unit cost; quantities above one are reflected in the label.
    pub fn stage(
        item: InventoryItem,
        quantity: Decimal,
        rate: Option<Decimal>,
    ) -> Result<Self, ChargeError> {
        if quantity <= Decimal::ZERO {
            return Err(ChargeError::NonPositiveQuantity);
        }
        let rate = match rate.or(item.unit_cost) {
            Some(r) => r,
            None => return Err(ChargeError::MissingRate),
        };
        let label = if quantity > Decimal::ONE {
            format!("{} ({}×)", item.name, quantity)
        } else {
            item.name.clone()
        };
        let line_total = quantity * rate;

        Ok(Self {
            item,
            quantity,
            rate,
            label,
            line_total,
        })
    }
}

/// The charge produced when the flow finalizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizedCharge {
    pub inventory_item_id: Uuid,
    pub label: String,
    pub amount: Decimal,
    pub quantity: Decimal,
    /// Whether stock was actually deducted for this charge
    pub deducted: bool,
}

impl FinalizedCharge {
    fn from_pending(pending: &PendingCharge, deducted: bool) -> Self {
        Self {
            inventory_item_id: pending.item.id,
            label: pending.label.clone(),
            amount: pending.line_total,
            quantity: pending.quantity,
            deducted,
        }
    }
}

/// State machine over a single add-charge action
#[derive(Debug, Clone, Default)]
pub enum ChargeResolver {
    #[default]
    Idle,
    Selecting {
        pending: PendingCharge,
    },
    AwaitingDeductionDecision {
        pending: PendingCharge,
    },
    Finalized {
        charge: FinalizedCharge,
    },
}

impl ChargeResolver {
    pub fn new() -> Self {
        ChargeResolver::Idle
    }

    /// Select an item and stage the charge. Re-selecting while already in
    /// `Selecting` replaces the staged charge.
    pub fn select(
        self,
        item: InventoryItem,
        quantity: Decimal,
        rate: Option<Decimal>,
    ) -> Result<Self, ChargeError> {
        match self {
            ChargeResolver::Idle | ChargeResolver::Selecting { .. } => {
                let pending = PendingCharge::stage(item, quantity, rate)?;
                Ok(ChargeResolver::Selecting { pending })
            }
            _ => Err(ChargeError::InvalidTransition("select requires Idle or Selecting")),
        }
    }

    /// Confirm the staged charge. Consumables must pass through the
    /// deduction decision; anything else finalizes without deduction.
    pub fn confirm(self) -> Result<Self, ChargeError> {
        match self {
            ChargeResolver::Selecting { pending } => {
                if pending.item.kind.is_consumable() {
                    Ok(ChargeResolver::AwaitingDeductionDecision { pending })
                } else {
                    let charge = FinalizedCharge::from_pending(&pending, false);
                    Ok(ChargeResolver::Finalized { charge })
                }
            }
            _ => Err(ChargeError::InvalidTransition("confirm requires Selecting")),
        }
    }

    /// The stock deduction succeeded; finalize with `deducted = true`.
    pub fn deduction_succeeded(self) -> Result<Self, ChargeError> {
        match self {
            ChargeResolver::AwaitingDeductionDecision { pending } => {
                let charge = FinalizedCharge::from_pending(&pending, true);
                Ok(ChargeResolver::Finalized { charge })
            }
            _ => Err(ChargeError::InvalidTransition(
                "deduction_succeeded requires AwaitingDeductionDecision",
            )),
        }
    }

    /// The stock deduction failed. The charge is not appended; the machine
    /// stays at the decision point so the operator can retry or back out.
    pub fn deduction_failed(self) -> Result<Self, ChargeError> {
        match self {
            ChargeResolver::AwaitingDeductionDecision { pending } => {
                Ok(ChargeResolver::AwaitingDeductionDecision { pending })
            }
            _ => Err(ChargeError::InvalidTransition(
                "deduction_failed requires AwaitingDeductionDecision",
            )),
        }
    }

    /// Add the charge without consuming stock (e.g. a flat fee labelled
    /// after an item).
    pub fn add_without_deduction(self) -> Result<Self, ChargeError> {
        match self {
            ChargeResolver::AwaitingDeductionDecision { pending } => {
                let charge = FinalizedCharge::from_pending(&pending, false);
                Ok(ChargeResolver::Finalized { charge })
            }
            _ => Err(ChargeError::InvalidTransition(
                "add_without_deduction requires AwaitingDeductionDecision",
            )),
        }
    }

    /// Back out of the deduction decision, returning to `Selecting`.
    pub fn back(self) -> Result<Self, ChargeError> {
        match self {
            ChargeResolver::AwaitingDeductionDecision { pending } => {
                Ok(ChargeResolver::Selecting { pending })
            }
            _ => Err(ChargeError::InvalidTransition(
                "back requires AwaitingDeductionDecision",
            )),
        }
    }

    /// The staged charge, if any
    pub fn pending(&self) -> Option<&PendingCharge> {
        match self {
            ChargeResolver::Selecting { pending }
            | ChargeResolver::AwaitingDeductionDecision { pending } => Some(pending),
            _ => None,
        }
    }

    /// The finalized charge, once the flow completes
    pub fn finalized(&self) -> Option<&FinalizedCharge> {
        match self {
            ChargeResolver::Finalized { charge } => Some(charge),
            _ => None,
        }
    }

    /// Whether the flow is waiting for the deduct / add-without-deduction
    /// decision
    pub fn awaiting_deduction_decision(&self) -> bool {
        matches!(self, ChargeResolver::AwaitingDeductionDecision { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;
    use chrono::Utc;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(kind: ItemKind, unit_cost: Option<&str>) -> InventoryItem {
        InventoryItem {
            id: Uuid::new_v4(),
            name: "Brake Fluid".to_string(),
            kind,
            quantity: dec("10"),
            unit_cost: unit_cost.map(dec),
            reorder_level: Some(dec("2")),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_consumable_requires_deduction_decision() {
        let resolver = ChargeResolver::new()
            .select(item(ItemKind::Consumable, Some("50")), dec("3"), None)
            .unwrap()
            .confirm()
            .unwrap();
        assert!(resolver.awaiting_deduction_decision());
        assert_eq!(resolver.pending().unwrap().line_total, dec("150"));
    }

    #[test]
    fn test_non_consumable_finalizes_without_prompt() {
        let resolver = ChargeResolver::new()
            .select(item(ItemKind::NonConsumable, Some("50")), dec("1"), None)
            .unwrap()
            .confirm()
            .unwrap();
        let charge = resolver.finalized().unwrap();
        assert!(!charge.deducted);
        assert_eq!(charge.label, "Brake Fluid");
    }

    #[test]
    fn test_label_carries_quantity_above_one() {
        let pending =
            PendingCharge::stage(item(ItemKind::Consumable, Some("50")), dec("3"), None).unwrap();
        assert_eq!(pending.label, "Brake Fluid (3×)");
    }

    #[test]
    fn test_rate_defaults_to_unit_cost() {
        let pending =
            PendingCharge::stage(item(ItemKind::Consumable, Some("50")), dec("2"), None).unwrap();
        assert_eq!(pending.rate, dec("50"));
        assert_eq!(pending.line_total, dec("100"));
    }

    #[test]
    fn test_explicit_rate_overrides_unit_cost() {
        let pending = PendingCharge::stage(
            item(ItemKind::Consumable, Some("50")),
            dec("2"),
            Some(dec("75")),
        )
        .unwrap();
        assert_eq!(pending.line_total, dec("150"));
    }

    #[test]
    fn test_missing_rate_rejected() {
        let err = PendingCharge::stage(item(ItemKind::Consumable, None), dec("1"), None)
            .unwrap_err();
        assert_eq!(err, ChargeError::MissingRate);
    }

    #[test]
    fn test_deduction_failure_keeps_decision_open() {
        let resolver = ChargeResolver::new()
            .select(item(ItemKind::Consumable, Some("50")), dec("3"), None)
            .unwrap()
            .confirm()
            .unwrap()
            .deduction_failed()
            .unwrap();
        assert!(resolver.awaiting_deduction_decision());
        assert!(resolver.finalized().is_none());
    }

    #[test]
    fn test_deduction_success_finalizes_deducted() {
        let resolver = ChargeResolver::new()
            .select(item(ItemKind::Consumable, Some("50")), dec("3"), None)
            .unwrap()
            .confirm()
            .unwrap()
            .deduction_succeeded()
            .unwrap();
        let charge = resolver.finalized().unwrap();
        assert!(charge.deducted);
        assert_eq!(charge.amount, dec("150"));
    }

    #[test]
    fn test_back_returns_to_selecting() {
        let resolver = ChargeResolver::new()
            .select(item(ItemKind::Consumable, Some("50")), dec("3"), None)
            .unwrap()
            .confirm()
            .unwrap()
            .back()
            .unwrap();
        assert!(matches!(resolver, ChargeResolver::Selecting { .. }));
    }

    #[test]
    fn test_confirm_from_idle_is_invalid() {
        let err = ChargeResolver::new().confirm().unwrap_err();
        assert!(matches!(err, ChargeError::InvalidTransition(_)));
    }
}
