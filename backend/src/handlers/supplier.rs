//! Supplier and purchase handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::supplier::{
    CreatePurchaseInput, CreateSupplierInput, Supplier, SupplierPurchase, SupplierService,
    UpdatePurchaseInput, UpdateSupplierInput,
};
use crate::AppState;

/// List all suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.db);
    let suppliers = service.list().await?;
    Ok(Json(suppliers))
}

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(input): Json<CreateSupplierInput>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    let service = SupplierService::new(state.db);
    let supplier = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
    Json(input): Json<UpdateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.update(supplier_id, input).await?;
    Ok(Json(supplier))
}

/// Delete a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = SupplierService::new(state.db);
    service.delete(supplier_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List all purchases
pub async fn list_purchases(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SupplierPurchase>>> {
    let service = SupplierService::new(state.db);
    let purchases = service.list_purchases().await?;
    Ok(Json(purchases))
}

/// Record a purchase
pub async fn create_purchase(
    State(state): State<AppState>,
    Json(input): Json<CreatePurchaseInput>,
) -> AppResult<(StatusCode, Json<SupplierPurchase>)> {
    let service = SupplierService::new(state.db);
    let purchase = service.create_purchase(input).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

/// Update a purchase
pub async fn update_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
    Json(input): Json<UpdatePurchaseInput>,
) -> AppResult<Json<SupplierPurchase>> {
    let service = SupplierService::new(state.db);
    let purchase = service.update_purchase(purchase_id, input).await?;
    Ok(Json(purchase))
}

/// Delete a purchase
pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = SupplierService::new(state.db);
    service.delete_purchase(purchase_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
