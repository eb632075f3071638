//! Reporting service for dashboard metrics, period reports and CSV export

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::models::stock_status;
use shared::types::{DateRange, Timeframe};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub monthly_revenue: Decimal,
    pub monthly_expenses: Decimal,
    pub open_jobs: i64,
    pub unpaid_invoices: i64,
    pub low_stock_items: i64,
}

/// Revenue grouped by period
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct RevenueReportRow {
    pub period: String,
    pub invoice_count: i64,
    pub total: Decimal,
}

/// Expenses grouped by period and category
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ExpenseReportRow {
    pub period: String,
    pub category: String,
    pub expense_count: i64,
    pub total: Decimal,
}

/// Jobs grouped by period
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct JobReportRow {
    pub period: String,
    pub job_count: i64,
    pub completed_count: i64,
    pub labour_total: Decimal,
}

/// Inventory valuation snapshot row
#[derive(Debug, Serialize)]
pub struct InventoryReportRow {
    pub name: String,
    pub item_type: String,
    pub quantity: Decimal,
    pub unit_cost: Option<Decimal>,
    pub stock_value: Decimal,
    pub reorder_level: Option<Decimal>,
    pub status: String,
}

#[derive(Debug, sqlx::FromRow)]
struct InventorySnapshotRow {
    name: String,
    item_type: String,
    quantity: Decimal,
    unit_cost: Option<Decimal>,
    reorder_level: Option<Decimal>,
}

/// Report filter parameters
#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub timeframe: Option<Timeframe>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportFilter {
    /// Resolve the filter to a concrete date range. Explicit dates win,
    /// then month/year, then the current year.
    pub fn resolve_range(&self) -> AppResult<DateRange> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(AppError::Validation {
                    field: "end_date".to_string(),
                    message: "End date must not precede start date".to_string(),
                });
            }
            return Ok(DateRange { start, end });
        }

        let today = Utc::now().date_naive();
        let year = self.year.unwrap_or_else(|| today.year());

        match self.month {
            Some(month) => {
                let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
                    AppError::Validation {
                        field: "month".to_string(),
                        message: "Month must be between 1 and 12".to_string(),
                    }
                })?;
                let end = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1)
                }
                .and_then(|d| d.pred_opt())
                .ok_or_else(|| AppError::Internal("Date arithmetic failed".to_string()))?;
                Ok(DateRange { start, end })
            }
            None => {
                let start = NaiveDate::from_ymd_opt(year, 1, 1)
                    .ok_or_else(|| AppError::Internal("Date arithmetic failed".to_string()))?;
                let end = NaiveDate::from_ymd_opt(year, 12, 31)
                    .ok_or_else(|| AppError::Internal("Date arithmetic failed".to_string()))?;
                Ok(DateRange { start, end })
            }
        }
    }

    fn period_format(&self) -> &'static str {
        match self.timeframe.unwrap_or_default() {
            Timeframe::Daily => "YYYY-MM-DD",
            Timeframe::Weekly => "IYYY-\"W\"IW",
            Timeframe::Monthly => "YYYY-MM",
            Timeframe::Yearly => "YYYY",
        }
    }
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Dashboard metrics for the current month
    pub async fn dashboard(&self) -> AppResult<DashboardMetrics> {
        let today = Utc::now().date_naive();
        let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
            .ok_or_else(|| AppError::Internal("Date arithmetic failed".to_string()))?;

        let monthly_revenue = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(final_total), 0)
            FROM invoices
            WHERE invoice_date >= $1 AND payment_status = 'paid'
            "#,
        )
        .bind(month_start)
        .fetch_one(&self.db)
        .await?;

        let monthly_expenses = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE expense_date >= $1",
        )
        .bind(month_start)
        .fetch_one(&self.db)
        .await?;

        let open_jobs = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM jobs WHERE status IN ('pending', 'in_progress')",
        )
        .fetch_one(&self.db)
        .await?;

        let unpaid_invoices = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM invoices WHERE payment_status IN ('unpaid', 'partial')",
        )
        .fetch_one(&self.db)
        .await?;

        let low_stock_items = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventory_items WHERE quantity <= COALESCE(reorder_level, 0)",
        )
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardMetrics {
            monthly_revenue,
            monthly_expenses,
            open_jobs,
            unpaid_invoices,
            low_stock_items,
        })
    }

    /// Invoiced revenue grouped by period
    pub async fn revenue_report(&self, filter: &ReportFilter) -> AppResult<Vec<RevenueReportRow>> {
        let range = filter.resolve_range()?;

        let rows = sqlx::query_as::<_, RevenueReportRow>(&format!(
            r#"
            SELECT
                to_char(invoice_date, '{}') AS period,
                COUNT(*) AS invoice_count,
                COALESCE(SUM(final_total), 0) AS total
            FROM invoices
            WHERE invoice_date BETWEEN $1 AND $2
            GROUP BY period
            ORDER BY period
            "#,
            filter.period_format()
        ))
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Expenses grouped by period and category
    pub async fn expense_report(&self, filter: &ReportFilter) -> AppResult<Vec<ExpenseReportRow>> {
        let range = filter.resolve_range()?;

        let rows = sqlx::query_as::<_, ExpenseReportRow>(&format!(
            r#"
            SELECT
                to_char(expense_date, '{}') AS period,
                category,
                COUNT(*) AS expense_count,
                COALESCE(SUM(amount), 0) AS total
            FROM expenses
            WHERE expense_date BETWEEN $1 AND $2
            GROUP BY period, category
            ORDER BY period, category
            "#,
            filter.period_format()
        ))
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Jobs grouped by period
    pub async fn job_report(&self, filter: &ReportFilter) -> AppResult<Vec<JobReportRow>> {
        let range = filter.resolve_range()?;

        let rows = sqlx::query_as::<_, JobReportRow>(&format!(
            r#"
            SELECT
                to_char(job_date, '{}') AS period,
                COUNT(*) AS job_count,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_count,
                COALESCE(SUM(labour_cost), 0) AS labour_total
            FROM jobs
            WHERE job_date BETWEEN $1 AND $2
            GROUP BY period
            ORDER BY period
            "#,
            filter.period_format()
        ))
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Current inventory valuation snapshot
    pub async fn inventory_report(&self) -> AppResult<Vec<InventoryReportRow>> {
        let rows = sqlx::query_as::<_, InventorySnapshotRow>(
            r#"
            SELECT name, item_type, quantity, unit_cost, reorder_level
            FROM inventory_items
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let status = stock_status(r.quantity, r.reorder_level);
                InventoryReportRow {
                    stock_value: r.quantity * r.unit_cost.unwrap_or(Decimal::ZERO),
                    status: status.as_str().to_string(),
                    name: r.name,
                    item_type: r.item_type,
                    quantity: r.quantity,
                    unit_cost: r.unit_cost,
                    reorder_level: r.reorder_level,
                }
            })
            .collect())
    }

    /// Serialize report rows to CSV for download
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
