//! Customer handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::customer::{
    CreateCustomerInput, Customer, CustomerService, UpdateCustomerInput,
};
use crate::AppState;

/// List all customers
pub async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    let service = CustomerService::new(state.db);
    let customers = service.list().await?;
    Ok(Json(customers))
}

/// Create a customer
pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomerInput>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let service = CustomerService::new(state.db);
    let customer = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Update a customer
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<UpdateCustomerInput>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    let customer = service.update(customer_id, input).await?;
    Ok(Json(customer))
}

/// Delete a customer
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = CustomerService::new(state.db);
    service.delete(customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
