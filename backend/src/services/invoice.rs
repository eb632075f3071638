//! Invoice service
//!
//! Totals are stored as aggregates alongside the invoice and recomputed from
//! the line rows after every mutation, so readers can trust either path.
//! Adding an inventory-backed charge runs the stock deduction and the charge
//! append in one transaction; a failed deduction leaves no charge behind.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::InventoryService;
use shared::models::{
    derive_totals, ChargeResolver, ExtraKind, InvoiceDetail, InvoiceExtra, InvoiceLineItem,
    InvoiceTotals, ItemKind, PaymentStatus,
};
use shared::validation::validate_non_negative_amount;

/// Invoice service
#[derive(Clone)]
pub struct InvoiceService {
    db: PgPool,
}

/// Invoice list row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InvoiceSummary {
    pub id: Uuid,
    pub invoice_no: String,
    pub job_id: Option<Uuid>,
    pub invoice_date: NaiveDate,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub final_total: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: Uuid,
    invoice_no: String,
    job_id: Option<Uuid>,
    invoice_date: NaiveDate,
    payment_status: String,
    payment_method: Option<String>,
    notes: Option<String>,
    items_total: Option<Decimal>,
    total_charges: Option<Decimal>,
    total_deductions: Option<Decimal>,
    final_total: Option<Decimal>,
}

#[derive(Debug, FromRow)]
struct LineItemRow {
    id: Uuid,
    inventory_item_id: Option<Uuid>,
    item_name: String,
    item_type: Option<String>,
    quantity: Decimal,
    unit_price: Decimal,
    line_total: Decimal,
}

#[derive(Debug, FromRow)]
struct ExtraRow {
    id: Uuid,
    label: String,
    extra_type: String,
    amount: Decimal,
}

/// Invoice detail plus derived totals
#[derive(Debug, Serialize)]
pub struct InvoiceDetailResponse {
    #[serde(flatten)]
    pub detail: InvoiceDetail,
    pub totals: InvoiceTotals,
    pub advance_received: Decimal,
}

/// Replacement charge or reduction line in a PUT body
#[derive(Debug, Deserialize)]
pub struct ExtraInput {
    pub label: String,
    pub amount: Decimal,
}

/// PUT body: payment fields plus full replacement of charges and reductions
#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceInput {
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    pub notes: Option<String>,
    pub charges: Option<Vec<ExtraInput>>,
    pub reductions: Option<Vec<ExtraInput>>,
}

/// Body for adding an inventory item as a charge
#[derive(Debug, Deserialize)]
pub struct InventoryChargeInput {
    pub inventory_item_id: Uuid,
    pub quantity: Decimal,
    pub rate: Option<Decimal>,
    /// Deduct stock for the charged quantity. Only meaningful for
    /// consumables; other kinds never deduct.
    #[serde(default)]
    pub deduct: bool,
}

const INVOICE_COLUMNS: &str = "id, invoice_no, job_id, invoice_date, payment_status, \
     payment_method, notes, items_total, total_charges, total_deductions, final_total";

impl InvoiceService {
    /// Create a new InvoiceService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List invoices, newest first
    pub async fn list(&self) -> AppResult<Vec<InvoiceSummary>> {
        let invoices = sqlx::query_as::<_, InvoiceSummary>(
            r#"
            SELECT id, invoice_no, job_id, invoice_date, payment_status, payment_method,
                   final_total, created_at
            FROM invoices
            ORDER BY invoice_date DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(invoices)
    }

    /// Get one invoice with its items, charges, reductions and derived totals
    pub async fn get_detail(&self, invoice_id: Uuid) -> AppResult<InvoiceDetailResponse> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {} FROM invoices WHERE id = $1",
            INVOICE_COLUMNS
        ))
        .bind(invoice_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice".to_string()))?;

        let item_rows = sqlx::query_as::<_, LineItemRow>(
            r#"
            SELECT id, inventory_item_id, item_name, item_type, quantity, unit_price, line_total
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY item_name
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.db)
        .await?;

        let extra_rows = sqlx::query_as::<_, ExtraRow>(
            r#"
            SELECT id, label, extra_type, amount
            FROM invoice_extras
            WHERE invoice_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.db)
        .await?;

        let detail = Self::build_detail(row, item_rows, extra_rows)?;
        let totals = derive_totals(&detail);
        let advance_received = detail.advance_received();

        Ok(InvoiceDetailResponse {
            detail,
            totals,
            advance_received,
        })
    }

    fn build_detail(
        row: InvoiceRow,
        item_rows: Vec<LineItemRow>,
        extra_rows: Vec<ExtraRow>,
    ) -> AppResult<InvoiceDetail> {
        let payment_status = PaymentStatus::parse(&row.payment_status).ok_or_else(|| {
            AppError::Internal(format!("Unknown payment status: {}", row.payment_status))
        })?;

        let items = item_rows
            .into_iter()
            .map(|r| InvoiceLineItem {
                id: r.id,
                inventory_item_id: r.inventory_item_id,
                item_name: r.item_name,
                item_kind: r.item_type.as_deref().and_then(ItemKind::parse),
                quantity: r.quantity,
                unit_price: r.unit_price,
                line_total: r.line_total,
            })
            .collect();

        let mut charges = Vec::new();
        let mut reductions = Vec::new();
        for r in extra_rows {
            let kind = ExtraKind::parse(&r.extra_type).ok_or_else(|| {
                AppError::Internal(format!("Unknown extra type: {}", r.extra_type))
            })?;
            let extra = InvoiceExtra {
                id: r.id,
                label: r.label,
                kind,
                amount: r.amount,
            };
            match kind {
                ExtraKind::Charge => charges.push(extra),
                ExtraKind::Deduction => reductions.push(extra),
            }
        }

        Ok(InvoiceDetail {
            id: row.id,
            invoice_no: row.invoice_no,
            job_id: row.job_id,
            invoice_date: row.invoice_date,
            payment_status,
            payment_method: row.payment_method,
            notes: row.notes,
            items,
            charges,
            reductions,
            items_total: row.items_total,
            total_charges: row.total_charges,
            total_deductions: row.total_deductions,
            final_total: row.final_total,
        })
    }

    /// Update payment fields and replace the charge and reduction lines.
    /// Aggregates are recomputed from the rows before commit.
    pub async fn update(
        &self,
        invoice_id: Uuid,
        input: UpdateInvoiceInput,
    ) -> AppResult<InvoiceDetailResponse> {
        if let Some(status) = input.payment_status.as_deref() {
            if PaymentStatus::parse(status).is_none() {
                return Err(AppError::Validation {
                    field: "payment_status".to_string(),
                    message: "Payment status must be unpaid, partial or paid".to_string(),
                });
            }
        }
        for extra in input
            .charges
            .iter()
            .flatten()
            .chain(input.reductions.iter().flatten())
        {
            if extra.label.trim().is_empty() {
                return Err(AppError::Validation {
                    field: "label".to_string(),
                    message: "Label is required".to_string(),
                });
            }
            validate_non_negative_amount(extra.amount).map_err(|msg| AppError::Validation {
                field: "amount".to_string(),
                message: msg.to_string(),
            })?;
        }

        let mut tx = self.db.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE invoices
            SET payment_method = COALESCE($1, payment_method),
                payment_status = COALESCE($2, payment_status),
                notes = COALESCE($3, notes),
                updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(&input.payment_method)
        .bind(&input.payment_status)
        .bind(&input.notes)
        .bind(invoice_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Invoice".to_string()));
        }

        if let Some(charges) = &input.charges {
            Self::replace_extras(&mut tx, invoice_id, ExtraKind::Charge, charges).await?;
        }
        if let Some(reductions) = &input.reductions {
            Self::replace_extras(&mut tx, invoice_id, ExtraKind::Deduction, reductions).await?;
        }

        Self::recompute_aggregates(&mut tx, invoice_id).await?;
        tx.commit().await?;

        self.get_detail(invoice_id).await
    }

    async fn replace_extras(
        tx: &mut Transaction<'_, Postgres>,
        invoice_id: Uuid,
        kind: ExtraKind,
        extras: &[ExtraInput],
    ) -> AppResult<()> {
        // Replacement clears the item reference on deduction-backed charges;
        // stock already deducted stays deducted.
        sqlx::query("DELETE FROM invoice_extras WHERE invoice_id = $1 AND extra_type = $2")
            .bind(invoice_id)
            .bind(kind.as_str())
            .execute(&mut **tx)
            .await?;

        for extra in extras {
            sqlx::query(
                "INSERT INTO invoice_extras (invoice_id, label, extra_type, amount) VALUES ($1, $2, $3, $4)",
            )
            .bind(invoice_id)
            .bind(&extra.label)
            .bind(kind.as_str())
            .bind(extra.amount)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    /// Add an inventory item to an invoice as a charge. For a consumable
    /// with `deduct` set, stock is deducted first and the charge appended
    /// only when the deduction succeeded, all inside one transaction.
    pub async fn add_inventory_charge(
        &self,
        invoice_id: Uuid,
        input: InventoryChargeInput,
    ) -> AppResult<InvoiceDetailResponse> {
        let invoice_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM invoices WHERE id = $1)")
                .bind(invoice_id)
                .fetch_one(&self.db)
                .await?;

        if !invoice_exists {
            return Err(AppError::NotFound("Invoice".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let item = InventoryService::fetch_item_in_tx(&mut tx, input.inventory_item_id).await?;

        let resolver = ChargeResolver::new()
            .select(item, input.quantity, input.rate)
            .map_err(|e| AppError::ValidationError(e.to_string()))?
            .confirm()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let resolver = if resolver.awaiting_deduction_decision() {
            if input.deduct {
                InventoryService::deduct_in_tx(&mut tx, input.inventory_item_id, input.quantity)
                    .await?;
                resolver
                    .deduction_succeeded()
                    .map_err(|e| AppError::InvalidStateTransition(e.to_string()))?
            } else {
                resolver
                    .add_without_deduction()
                    .map_err(|e| AppError::InvalidStateTransition(e.to_string()))?
            }
        } else {
            resolver
        };

        let charge = resolver
            .finalized()
            .ok_or_else(|| AppError::Internal("Charge was not finalized".to_string()))?;

        let deducted_quantity = charge.deducted.then_some(charge.quantity);

        sqlx::query(
            r#"
            INSERT INTO invoice_extras
                (invoice_id, label, extra_type, amount, inventory_item_id, deducted_quantity)
            VALUES ($1, $2, 'charge', $3, $4, $5)
            "#,
        )
        .bind(invoice_id)
        .bind(&charge.label)
        .bind(charge.amount)
        .bind(charge.inventory_item_id)
        .bind(deducted_quantity)
        .execute(&mut *tx)
        .await?;

        Self::recompute_aggregates(&mut tx, invoice_id).await?;
        tx.commit().await?;

        self.get_detail(invoice_id).await
    }

    /// Delete an invoice, restoring stock for every deduction-backed charge
    pub async fn delete(&self, invoice_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // Rows written by add_inventory_charge carry the item reference and
        // the exact quantity that was taken out of stock.
        let deducted_extras = sqlx::query_as::<_, (Uuid, Decimal)>(
            r#"
            SELECT inventory_item_id, deducted_quantity
            FROM invoice_extras
            WHERE invoice_id = $1
              AND inventory_item_id IS NOT NULL
              AND deducted_quantity IS NOT NULL
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&mut *tx)
        .await?;

        for (item_id, quantity) in deducted_extras {
            InventoryService::restore_in_tx(&mut tx, item_id, quantity).await?;
        }

        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(invoice_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Invoice".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Recompute the stored aggregates from the line rows
    async fn recompute_aggregates(
        tx: &mut Transaction<'_, Postgres>,
        invoice_id: Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE invoices SET
                items_total = agg.items_total,
                total_charges = agg.total_charges,
                total_deductions = agg.total_deductions,
                final_total = agg.items_total + agg.total_charges - agg.total_deductions,
                updated_at = NOW()
            FROM (
                SELECT
                    COALESCE((SELECT SUM(line_total) FROM invoice_items WHERE invoice_id = $1), 0)
                        AS items_total,
                    COALESCE((SELECT SUM(amount) FROM invoice_extras
                              WHERE invoice_id = $1 AND extra_type = 'charge'), 0)
                        AS total_charges,
                    COALESCE((SELECT SUM(amount) FROM invoice_extras
                              WHERE invoice_id = $1 AND extra_type = 'deduction'), 0)
                        AS total_deductions
            ) AS agg
            WHERE invoices.id = $1
            "#,
        )
        .bind(invoice_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
