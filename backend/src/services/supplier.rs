//! Supplier register and purchase tracking service
//!
//! A purchase that references an inventory item adds the purchased quantity
//! to stock when recorded; purchases without an item reference are
//! cost-only records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::validation::{validate_name, validate_positive_amount, validate_positive_quantity};

/// Supplier service
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// Supplier record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Supplier purchase record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SupplierPurchase {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub inventory_item_id: Option<Uuid>,
    pub description: String,
    pub quantity: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub total_cost: Decimal,
    pub purchase_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a supplier
#[derive(Debug, Deserialize)]
pub struct CreateSupplierInput {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Input for updating a supplier
#[derive(Debug, Deserialize)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Input for recording a purchase
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseInput {
    pub supplier_id: Uuid,
    pub inventory_item_id: Option<Uuid>,
    pub description: String,
    pub quantity: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
}

/// Input for updating a purchase (cost fields only; stock effects are not
/// replayed retroactively)
#[derive(Debug, Deserialize)]
pub struct UpdatePurchaseInput {
    pub description: Option<String>,
    pub total_cost: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
}

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all suppliers
    pub async fn list(&self) -> AppResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, phone, email, address, created_at, updated_at
            FROM suppliers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(suppliers)
    }

    /// Create a supplier
    pub async fn create(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, phone, email, address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, phone, email, address, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(supplier)
    }

    /// Update a supplier, keeping unspecified fields
    pub async fn update(&self, supplier_id: Uuid, input: UpdateSupplierInput) -> AppResult<Supplier> {
        let existing = sqlx::query_as::<_, Supplier>(
            "SELECT id, name, phone, email, address, created_at, updated_at FROM suppliers WHERE id = $1",
        )
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        let name = input.name.unwrap_or(existing.name);
        let phone = input.phone.or(existing.phone);
        let email = input.email.or(existing.email);
        let address = input.address.or(existing.address);

        validate_name(&name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
            SET name = $1, phone = $2, email = $3, address = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, name, phone, email, address, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&phone)
        .bind(&email)
        .bind(&address)
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await?;

        Ok(supplier)
    }

    /// Delete a supplier (cascades to its purchases)
    pub async fn delete(&self, supplier_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(supplier_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        Ok(())
    }

    /// List all purchases, newest first
    pub async fn list_purchases(&self) -> AppResult<Vec<SupplierPurchase>> {
        let purchases = sqlx::query_as::<_, SupplierPurchase>(
            r#"
            SELECT id, supplier_id, inventory_item_id, description, quantity, unit_cost,
                   total_cost, purchase_date, created_at
            FROM supplier_purchases
            ORDER BY purchase_date DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(purchases)
    }

    /// Record a purchase. When an inventory item is referenced, the
    /// purchased quantity is added to its stock in the same transaction.
    pub async fn create_purchase(&self, input: CreatePurchaseInput) -> AppResult<SupplierPurchase> {
        if input.description.trim().is_empty() {
            return Err(AppError::Validation {
                field: "description".to_string(),
                message: "Description is required".to_string(),
            });
        }

        let supplier_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)")
                .bind(input.supplier_id)
                .fetch_one(&self.db)
                .await?;

        if !supplier_exists {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        // Stock-affecting purchases need a positive quantity
        if input.inventory_item_id.is_some() {
            let quantity = input.quantity.ok_or_else(|| AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity is required for inventory purchases".to_string(),
            })?;
            validate_positive_quantity(quantity).map_err(|msg| AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
            })?;
        }

        // Derive total cost from quantity * unit_cost when not supplied
        let total_cost = match (input.total_cost, input.quantity, input.unit_cost) {
            (Some(total), _, _) => total,
            (None, Some(qty), Some(unit)) => qty * unit,
            _ => {
                return Err(AppError::Validation {
                    field: "total_cost".to_string(),
                    message: "Either total_cost or quantity and unit_cost are required"
                        .to_string(),
                })
            }
        };
        validate_positive_amount(total_cost).map_err(|msg| AppError::Validation {
            field: "total_cost".to_string(),
            message: msg.to_string(),
        })?;

        let purchase_date = input.purchase_date.unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.db.begin().await?;

        if let Some(item_id) = input.inventory_item_id {
            let updated = sqlx::query(
                "UPDATE inventory_items SET quantity = quantity + $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(input.quantity)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(AppError::NotFound("Inventory item".to_string()));
            }
        }

        let purchase = sqlx::query_as::<_, SupplierPurchase>(
            r#"
            INSERT INTO supplier_purchases
                (supplier_id, inventory_item_id, description, quantity, unit_cost, total_cost, purchase_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, supplier_id, inventory_item_id, description, quantity, unit_cost,
                      total_cost, purchase_date, created_at
            "#,
        )
        .bind(input.supplier_id)
        .bind(input.inventory_item_id)
        .bind(&input.description)
        .bind(input.quantity)
        .bind(input.unit_cost)
        .bind(total_cost)
        .bind(purchase_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(purchase)
    }

    /// Update a purchase's cost fields
    pub async fn update_purchase(
        &self,
        purchase_id: Uuid,
        input: UpdatePurchaseInput,
    ) -> AppResult<SupplierPurchase> {
        let existing = sqlx::query_as::<_, SupplierPurchase>(
            r#"
            SELECT id, supplier_id, inventory_item_id, description, quantity, unit_cost,
                   total_cost, purchase_date, created_at
            FROM supplier_purchases WHERE id = $1
            "#,
        )
        .bind(purchase_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        let description = input.description.unwrap_or(existing.description);
        let total_cost = input.total_cost.unwrap_or(existing.total_cost);
        let purchase_date = input.purchase_date.unwrap_or(existing.purchase_date);

        validate_positive_amount(total_cost).map_err(|msg| AppError::Validation {
            field: "total_cost".to_string(),
            message: msg.to_string(),
        })?;

        let purchase = sqlx::query_as::<_, SupplierPurchase>(
            r#"
            UPDATE supplier_purchases
            SET description = $1, total_cost = $2, purchase_date = $3
            WHERE id = $4
            RETURNING id, supplier_id, inventory_item_id, description, quantity, unit_cost,
                      total_cost, purchase_date, created_at
            "#,
        )
        .bind(&description)
        .bind(total_cost)
        .bind(purchase_date)
        .bind(purchase_id)
        .fetch_one(&self.db)
        .await?;

        Ok(purchase)
    }

    /// Delete a purchase. Stock added on create is not clawed back.
    pub async fn delete_purchase(&self, purchase_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM supplier_purchases WHERE id = $1")
            .bind(purchase_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Purchase".to_string()));
        }

        Ok(())
    }
}
