//! Job handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::job::{CreateJobInput, Job, JobService, JobUpdateResult, UpdateJobInput};
use crate::AppState;

/// List all jobs
pub async fn list_jobs(State(state): State<AppState>) -> AppResult<Json<Vec<Job>>> {
    let service = JobService::new(state.db);
    let jobs = service.list().await?;
    Ok(Json(jobs))
}

/// Create a job
pub async fn create_job(
    State(state): State<AppState>,
    Json(input): Json<CreateJobInput>,
) -> AppResult<(StatusCode, Json<Job>)> {
    let service = JobService::new(state.db);
    let job = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// Update a job, optionally raising an invoice for it
pub async fn update_job(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(job_id): Path<Uuid>,
    Json(input): Json<UpdateJobInput>,
) -> AppResult<Json<JobUpdateResult>> {
    let service = JobService::new(state.db);
    let result = service.update(job_id, input).await?;
    if let Some(invoice_id) = result.invoice_id {
        tracing::info!(user = %current_user.0.email, %job_id, %invoice_id, "invoice raised for job");
    }
    Ok(Json(result))
}

/// Delete a job
pub async fn delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = JobService::new(state.db);
    service.delete(job_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
