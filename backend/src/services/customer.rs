//! Customer management service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::validation::{validate_email, validate_name, validate_phone};

/// Customer service for the customer register
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

/// Customer record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a customer
#[derive(Debug, Deserialize)]
pub struct CreateCustomerInput {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Input for updating a customer
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

fn validate_contact(phone: Option<&str>, email: Option<&str>) -> AppResult<()> {
    if let Some(phone) = phone {
        validate_phone(phone).map_err(|msg| AppError::Validation {
            field: "phone".to_string(),
            message: msg.to_string(),
        })?;
    }
    if let Some(email) = email {
        validate_email(email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
        })?;
    }
    Ok(())
}

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all customers, newest first
    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, email, address, created_at, updated_at
            FROM customers
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(customers)
    }

    /// Create a customer
    pub async fn create(&self, input: CreateCustomerInput) -> AppResult<Customer> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_contact(input.phone.as_deref(), input.email.as_deref())?;

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, phone, email, address)
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

        Ok(customer)
    }

    /// Update a customer, keeping unspecified fields
    pub async fn update(&self, customer_id: Uuid, input: UpdateCustomerInput) -> AppResult<Customer> {
        let existing = sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, email, address, created_at, updated_at FROM customers WHERE id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        let name = input.name.unwrap_or(existing.name);
        let phone = input.phone.or(existing.phone);
        let email = input.email.or(existing.email);
        let address = input.address.or(existing.address);

        validate_name(&name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_contact(phone.as_deref(), email.as_deref())?;

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET name = $1, phone = $2, email = $3, address = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, name, phone, email, address, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&phone)
        .bind(&email)
        .bind(&address)
        .bind(customer_id)
        .fetch_one(&self.db)
        .await?;

        Ok(customer)
    }

    /// Delete a customer (cascades to their vehicles)
    pub async fn delete(&self, customer_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(customer_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        Ok(())
    }
}
