//! Invoice handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::invoice::{
    InventoryChargeInput, InvoiceDetailResponse, InvoiceService, InvoiceSummary,
    UpdateInvoiceInput,
};
use crate::AppState;

/// List all invoices
pub async fn list_invoices(State(state): State<AppState>) -> AppResult<Json<Vec<InvoiceSummary>>> {
    let service = InvoiceService::new(state.db);
    let invoices = service.list().await?;
    Ok(Json(invoices))
}

/// Get one invoice with items, charges, reductions and derived totals
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<Json<InvoiceDetailResponse>> {
    let service = InvoiceService::new(state.db);
    let detail = service.get_detail(invoice_id).await?;
    Ok(Json(detail))
}

/// Update payment fields and replace charge and reduction lines
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(input): Json<UpdateInvoiceInput>,
) -> AppResult<Json<InvoiceDetailResponse>> {
    let service = InvoiceService::new(state.db);
    let detail = service.update(invoice_id, input).await?;
    Ok(Json(detail))
}

/// Add an inventory item to an invoice as a charge, deducting stock for
/// consumables when requested
pub async fn add_inventory_charge(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(invoice_id): Path<Uuid>,
    Json(input): Json<InventoryChargeInput>,
) -> AppResult<Json<InvoiceDetailResponse>> {
    let service = InvoiceService::new(state.db);
    let detail = service.add_inventory_charge(invoice_id, input).await?;
    tracing::info!(user = %current_user.0.email, %invoice_id, "inventory charge added");
    Ok(Json(detail))
}

/// Delete an invoice, restoring deducted consumable stock
pub async fn delete_invoice(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = InvoiceService::new(state.db);
    service.delete(invoice_id).await?;
    tracing::info!(user = %current_user.0.email, %invoice_id, "invoice deleted, stock restored");
    Ok(StatusCode::NO_CONTENT)
}
