//! Inventory management service
//!
//! Stock lives in the `inventory_items` table; the low-stock classification
//! is computed from current data on every read. Deduction locks the row so
//! a charge can only be appended after the stock has actually left.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{InventoryItem, ItemKind, StockStatus};
use shared::validation::{validate_name, validate_positive_quantity};

/// Inventory service for stock items and deductions
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Raw inventory row as stored
#[derive(Debug, FromRow)]
struct InventoryRow {
    id: Uuid,
    name: String,
    item_type: String,
    quantity: Decimal,
    unit_cost: Option<Decimal>,
    reorder_level: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InventoryRow {
    fn into_item(self) -> AppResult<InventoryItem> {
        let kind = ItemKind::parse(&self.item_type).ok_or_else(|| {
            AppError::Internal(format!("Unknown inventory item type: {}", self.item_type))
        })?;
        Ok(InventoryItem {
            id: self.id,
            name: self.name,
            kind,
            quantity: self.quantity,
            unit_cost: self.unit_cost,
            reorder_level: self.reorder_level,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Inventory item with its computed stock status
#[derive(Debug, Clone, Serialize)]
pub struct InventoryItemView {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub status: StockStatus,
}

impl From<InventoryItem> for InventoryItemView {
    fn from(item: InventoryItem) -> Self {
        let status = item.stock_status();
        Self { item, status }
    }
}

/// Input for creating an inventory item
#[derive(Debug, Deserialize)]
pub struct CreateItemInput {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub quantity: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub reorder_level: Option<Decimal>,
}

/// Input for updating an inventory item
#[derive(Debug, Deserialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ItemKind>,
    pub quantity: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub reorder_level: Option<Decimal>,
}

/// Input for the stock deduction endpoint
#[derive(Debug, Deserialize)]
pub struct DeductInput {
    pub quantity: Decimal,
}

const SELECT_COLUMNS: &str =
    "id, name, item_type, quantity, unit_cost, reorder_level, created_at, updated_at";

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all items with their stock status
    pub async fn list(&self) -> AppResult<Vec<InventoryItemView>> {
        let rows = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {} FROM inventory_items ORDER BY name",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|r| r.into_item().map(InventoryItemView::from))
            .collect()
    }

    /// Get a single item
    pub async fn get(&self, item_id: Uuid) -> AppResult<InventoryItemView> {
        let row = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {} FROM inventory_items WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        Ok(row.into_item()?.into())
    }

    /// Create an inventory item
    pub async fn create(&self, input: CreateItemInput) -> AppResult<InventoryItemView> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        let quantity = input.quantity.unwrap_or(Decimal::ZERO);
        if quantity < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity cannot be negative".to_string(),
            });
        }

        let row = sqlx::query_as::<_, InventoryRow>(&format!(
            r#"
            INSERT INTO inventory_items (name, item_type, quantity, unit_cost, reorder_level)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(&input.name)
        .bind(input.kind.as_str())
        .bind(quantity)
        .bind(input.unit_cost)
        .bind(input.reorder_level)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into_item()?.into())
    }

    /// Update an inventory item, keeping unspecified fields
    pub async fn update(&self, item_id: Uuid, input: UpdateItemInput) -> AppResult<InventoryItemView> {
        let existing = self.get(item_id).await?.item;

        let name = input.name.unwrap_or(existing.name);
        let kind = input.kind.unwrap_or(existing.kind);
        let quantity = input.quantity.unwrap_or(existing.quantity);
        let unit_cost = input.unit_cost.or(existing.unit_cost);
        let reorder_level = input.reorder_level.or(existing.reorder_level);

        validate_name(&name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        if quantity < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity cannot be negative".to_string(),
            });
        }

        let row = sqlx::query_as::<_, InventoryRow>(&format!(
            r#"
            UPDATE inventory_items
            SET name = $1, item_type = $2, quantity = $3, unit_cost = $4,
                reorder_level = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(&name)
        .bind(kind.as_str())
        .bind(quantity)
        .bind(unit_cost)
        .bind(reorder_level)
        .bind(item_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into_item()?.into())
    }

    /// Delete an inventory item
    pub async fn delete(&self, item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Inventory item".to_string()));
        }

        Ok(())
    }

    /// Deduct stock for a consumable use
    pub async fn deduct(&self, item_id: Uuid, input: DeductInput) -> AppResult<InventoryItemView> {
        validate_positive_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        let mut tx = self.db.begin().await?;
        let item = Self::deduct_in_tx(&mut tx, item_id, input.quantity).await?;
        tx.commit().await?;

        Ok(item.into())
    }

    /// Fetch an item inside an existing transaction
    pub async fn fetch_item_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
    ) -> AppResult<InventoryItem> {
        let row = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {} FROM inventory_items WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(item_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        row.into_item()
    }

    /// Deduct stock inside an existing transaction. The row is locked so
    /// the balance check and the update are one atomic step; the caller
    /// appends dependent rows (e.g. an invoice charge) only after this
    /// returns Ok.
    pub async fn deduct_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
        quantity: Decimal,
    ) -> AppResult<InventoryItem> {
        let row = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {} FROM inventory_items WHERE id = $1 FOR UPDATE",
            SELECT_COLUMNS
        ))
        .bind(item_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        let item = row.into_item()?;

        if item.quantity < quantity {
            return Err(AppError::InsufficientStock(format!(
                "{} has {} in stock, requested {}",
                item.name, item.quantity, quantity
            )));
        }

        let row = sqlx::query_as::<_, InventoryRow>(&format!(
            r#"
            UPDATE inventory_items
            SET quantity = quantity - $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(quantity)
        .bind(item_id)
        .fetch_one(&mut **tx)
        .await?;

        row.into_item()
    }

    /// Restore stock inside an existing transaction (invoice deletion)
    pub async fn restore_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
        quantity: Decimal,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE inventory_items SET quantity = quantity + $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(quantity)
        .bind(item_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// List items currently at or below their reorder level
    pub async fn list_low_stock(&self) -> AppResult<Vec<InventoryItemView>> {
        let items = self.list().await?;
        Ok(items
            .into_iter()
            .filter(|v| v.status == StockStatus::LowStock)
            .collect())
    }
}
