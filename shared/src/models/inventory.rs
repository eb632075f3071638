//! Inventory item model and low-stock classification

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of inventory item. Consumables physically leave stock when used on
/// a job; non-consumables and bulk items are charged without deduction by
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Consumable,
    NonConsumable,
    Bulk,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Consumable => "consumable",
            ItemKind::NonConsumable => "non-consumable",
            ItemKind::Bulk => "bulk",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "consumable" => Some(ItemKind::Consumable),
            "non-consumable" => Some(ItemKind::NonConsumable),
            "bulk" => Some(ItemKind::Bulk),
            _ => None,
        }
    }

    pub fn is_consumable(&self) -> bool {
        matches!(self, ItemKind::Consumable)
    }
}

/// Stock status badge for an inventory row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "In Stock")]
    InStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::LowStock => "Low Stock",
            StockStatus::InStock => "In Stock",
        }
    }
}

/// An inventory item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub quantity: Decimal,
    pub unit_cost: Option<Decimal>,
    pub reorder_level: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Classify this item's stock level. Equality with the reorder level
    /// counts as low stock (reorder now, not after); a missing reorder
    /// level defaults to zero.
    pub fn stock_status(&self) -> StockStatus {
        stock_status(self.quantity, self.reorder_level)
    }
}

/// Low-stock classifier. Recomputed on every read from current data; there
/// is no persisted "acknowledged low stock" state.
pub fn stock_status(quantity: Decimal, reorder_level: Option<Decimal>) -> StockStatus {
    if quantity <= reorder_level.unwrap_or(Decimal::ZERO) {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_low_stock_below_threshold() {
        assert_eq!(
            stock_status(dec("3"), Some(dec("5"))),
            StockStatus::LowStock
        );
    }

    #[test]
    fn test_low_stock_at_threshold() {
        // Boundary: quantity == reorder_level is low stock, not in stock
        assert_eq!(
            stock_status(dec("5"), Some(dec("5"))),
            StockStatus::LowStock
        );
    }

    #[test]
    fn test_in_stock_above_threshold() {
        assert_eq!(stock_status(dec("6"), Some(dec("5"))), StockStatus::InStock);
    }

    #[test]
    fn test_missing_reorder_level_defaults_to_zero() {
        assert_eq!(stock_status(dec("0"), None), StockStatus::LowStock);
        assert_eq!(stock_status(dec("1"), None), StockStatus::InStock);
    }

    #[test]
    fn test_item_kind_roundtrip() {
        for kind in [ItemKind::Consumable, ItemKind::NonConsumable, ItemKind::Bulk] {
            assert_eq!(ItemKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ItemKind::parse("liquid"), None);
    }

    #[test]
    fn test_only_consumable_is_consumable() {
        assert!(ItemKind::Consumable.is_consumable());
        assert!(!ItemKind::NonConsumable.is_consumable());
        assert!(!ItemKind::Bulk.is_consumable());
    }
}
