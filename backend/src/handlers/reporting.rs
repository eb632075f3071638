//! Reporting handlers for dashboard metrics and data export

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::{AppError, AppResult};
use crate::services::reporting::{
    DashboardMetrics, ExpenseReportRow, InventoryReportRow, JobReportRow, ReportFilter,
    ReportingService, RevenueReportRow,
};
use crate::AppState;

/// Get dashboard metrics
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardMetrics>> {
    let service = ReportingService::new(state.db);
    let metrics = service.dashboard().await?;
    Ok(Json(metrics))
}

/// Get revenue grouped by period
pub async fn get_revenue_report(
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<Vec<RevenueReportRow>>> {
    let service = ReportingService::new(state.db);
    let rows = service.revenue_report(&filter).await?;
    Ok(Json(rows))
}

/// Get expenses grouped by period and category
pub async fn get_expense_report(
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<Vec<ExpenseReportRow>>> {
    let service = ReportingService::new(state.db);
    let rows = service.expense_report(&filter).await?;
    Ok(Json(rows))
}

/// Get jobs grouped by period
pub async fn get_job_report(
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<Vec<JobReportRow>>> {
    let service = ReportingService::new(state.db);
    let rows = service.job_report(&filter).await?;
    Ok(Json(rows))
}

/// Get the current inventory valuation snapshot
pub async fn get_inventory_report(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InventoryReportRow>>> {
    let service = ReportingService::new(state.db);
    let rows = service.inventory_report().await?;
    Ok(Json(rows))
}

/// Download a report as a CSV attachment (opens in Excel)
pub async fn export_report(
    State(state): State<AppState>,
    Path(report_type): Path<String>,
    Query(filter): Query<ReportFilter>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);

    let csv = match report_type.as_str() {
        "revenue" => ReportingService::export_to_csv(&service.revenue_report(&filter).await?)?,
        "expenses" => ReportingService::export_to_csv(&service.expense_report(&filter).await?)?,
        "jobs" => ReportingService::export_to_csv(&service.job_report(&filter).await?)?,
        "inventory" => ReportingService::export_to_csv(&service.inventory_report().await?)?,
        other => {
            return Err(AppError::NotFound(format!("Report type '{}'", other)));
        }
    };

    let disposition = format!("attachment; filename=\"{}_report.csv\"", report_type);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

/// PDF export is not available; the CSV export covers the same data
pub async fn export_report_pdf(Path(report_type): Path<String>) -> AppResult<()> {
    Err(AppError::NotImplemented(format!(
        "PDF export is not available; use /reports/{}/excel",
        report_type
    )))
}
