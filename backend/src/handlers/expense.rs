//! Expense handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::expense::{CreateExpenseInput, Expense, ExpenseService, UpdateExpenseInput};
use crate::AppState;

/// List all expenses
pub async fn list_expenses(State(state): State<AppState>) -> AppResult<Json<Vec<Expense>>> {
    let service = ExpenseService::new(state.db);
    let expenses = service.list().await?;
    Ok(Json(expenses))
}

/// Record an expense
pub async fn create_expense(
    State(state): State<AppState>,
    Json(input): Json<CreateExpenseInput>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let service = ExpenseService::new(state.db);
    let expense = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// Update an expense
pub async fn update_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
    Json(input): Json<UpdateExpenseInput>,
) -> AppResult<Json<Expense>> {
    let service = ExpenseService::new(state.db);
    let expense = service.update(expense_id, input).await?;
    Ok(Json(expense))
}

/// Delete an expense
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = ExpenseService::new(state.db);
    service.delete(expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
