//! Shop expense tracking service

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::validation::validate_positive_amount;

/// Expense service
#[derive(Clone)]
pub struct ExpenseService {
    db: PgPool,
}

/// Expense record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub category: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an expense
#[derive(Debug, Deserialize)]
pub struct CreateExpenseInput {
    pub category: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub expense_date: Option<NaiveDate>,
}

/// Input for updating an expense
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseInput {
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub expense_date: Option<NaiveDate>,
}

impl ExpenseService {
    /// Create a new ExpenseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List expenses, newest first
    pub async fn list(&self) -> AppResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, category, description, amount, expense_date, created_at, updated_at
            FROM expenses
            ORDER BY expense_date DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(expenses)
    }

    /// Record an expense
    pub async fn create(&self, input: CreateExpenseInput) -> AppResult<Expense> {
        if input.category.trim().is_empty() {
            return Err(AppError::Validation {
                field: "category".to_string(),
                message: "Category is required".to_string(),
            });
        }
        validate_positive_amount(input.amount).map_err(|msg| AppError::Validation {
            field: "amount".to_string(),
            message: msg.to_string(),
        })?;

        let expense_date = input.expense_date.unwrap_or_else(|| Utc::now().date_naive());

        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (category, description, amount, expense_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, category, description, amount, expense_date, created_at, updated_at
            "#,
        )
        .bind(&input.category)
        .bind(&input.description)
        .bind(input.amount)
        .bind(expense_date)
        .fetch_one(&self.db)
        .await?;

        Ok(expense)
    }

    /// Update an expense, keeping unspecified fields
    pub async fn update(&self, expense_id: Uuid, input: UpdateExpenseInput) -> AppResult<Expense> {
        let existing = sqlx::query_as::<_, Expense>(
            "SELECT id, category, description, amount, expense_date, created_at, updated_at FROM expenses WHERE id = $1",
        )
        .bind(expense_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense".to_string()))?;

        let category = input.category.unwrap_or(existing.category);
        let description = input.description.or(existing.description);
        let amount = input.amount.unwrap_or(existing.amount);
        let expense_date = input.expense_date.unwrap_or(existing.expense_date);

        validate_positive_amount(amount).map_err(|msg| AppError::Validation {
            field: "amount".to_string(),
            message: msg.to_string(),
        })?;

        let expense = sqlx::query_as::<_, Expense>(
            r#"
            UPDATE expenses
            SET category = $1, description = $2, amount = $3, expense_date = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, category, description, amount, expense_date, created_at, updated_at
            "#,
        )
        .bind(&category)
        .bind(&description)
        .bind(amount)
        .bind(expense_date)
        .bind(expense_id)
        .fetch_one(&self.db)
        .await?;

        Ok(expense)
    }

    /// Delete an expense
    pub async fn delete(&self, expense_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(expense_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Expense".to_string()));
        }

        Ok(())
    }
}
