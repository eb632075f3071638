//! Inventory handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::inventory::{
    CreateItemInput, DeductInput, InventoryItemView, InventoryService, UpdateItemInput,
};
use crate::AppState;

/// List inventory items with their stock status
pub async fn list_inventory(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InventoryItemView>>> {
    let service = InventoryService::new(state.db);
    let items = service.list().await?;
    Ok(Json(items))
}

/// Create an inventory item
pub async fn create_inventory_item(
    State(state): State<AppState>,
    Json(input): Json<CreateItemInput>,
) -> AppResult<(StatusCode, Json<InventoryItemView>)> {
    let service = InventoryService::new(state.db);
    let item = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update an inventory item
pub async fn update_inventory_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<InventoryItemView>> {
    let service = InventoryService::new(state.db);
    let item = service.update(item_id, input).await?;
    Ok(Json(item))
}

/// Delete an inventory item
pub async fn delete_inventory_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = InventoryService::new(state.db);
    service.delete(item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deduct stock from an item
pub async fn deduct_inventory(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<DeductInput>,
) -> AppResult<Json<InventoryItemView>> {
    let service = InventoryService::new(state.db);
    let item = service.deduct(item_id, input).await?;
    Ok(Json(item))
}
