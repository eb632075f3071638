//! Workshop job service
//!
//! Jobs move through pending, in_progress, completed and cancelled. An
//! update carrying `create_invoice: true` raises an invoice for the job in
//! the same request, numbered from the per-year sequence.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

const JOB_STATUSES: &[&str] = &["pending", "in_progress", "completed", "cancelled"];

/// Job service
#[derive(Clone)]
pub struct JobService {
    db: PgPool,
}

/// Job record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub description: String,
    pub status: String,
    pub labour_cost: Option<Decimal>,
    pub job_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a job
#[derive(Debug, Deserialize)]
pub struct CreateJobInput {
    pub customer_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub description: String,
    pub status: Option<String>,
    pub labour_cost: Option<Decimal>,
    pub job_date: Option<NaiveDate>,
}

/// Input for updating a job
#[derive(Debug, Deserialize)]
pub struct UpdateJobInput {
    pub vehicle_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub labour_cost: Option<Decimal>,
    pub job_date: Option<NaiveDate>,
    #[serde(default)]
    pub create_invoice: bool,
}

/// Update response, carrying the invoice id when one was raised
#[derive(Debug, Serialize)]
pub struct JobUpdateResult {
    #[serde(flatten)]
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<Uuid>,
}

fn validate_status(status: &str) -> AppResult<()> {
    if !JOB_STATUSES.contains(&status) {
        return Err(AppError::Validation {
            field: "status".to_string(),
            message: format!("Status must be one of: {}", JOB_STATUSES.join(", ")),
        });
    }
    Ok(())
}

const JOB_COLUMNS: &str = "id, customer_id, vehicle_id, technician_id, description, status, \
     labour_cost, job_date, created_at, updated_at";

impl JobService {
    /// Create a new JobService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List jobs, newest first
    pub async fn list(&self) -> AppResult<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs ORDER BY job_date DESC, created_at DESC",
            JOB_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(jobs)
    }

    /// Create a job
    pub async fn create(&self, input: CreateJobInput) -> AppResult<Job> {
        if input.description.trim().is_empty() {
            return Err(AppError::Validation {
                field: "description".to_string(),
                message: "Description is required".to_string(),
            });
        }

        let status = input.status.unwrap_or_else(|| "pending".to_string());
        validate_status(&status)?;

        let customer_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
                .bind(input.customer_id)
                .fetch_one(&self.db)
                .await?;

        if !customer_exists {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        let job_date = input.job_date.unwrap_or_else(|| Utc::now().date_naive());

        let job = sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs (customer_id, vehicle_id, technician_id, description, status, labour_cost, job_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(input.customer_id)
        .bind(input.vehicle_id)
        .bind(input.technician_id)
        .bind(&input.description)
        .bind(&status)
        .bind(input.labour_cost)
        .bind(job_date)
        .fetch_one(&self.db)
        .await?;

        Ok(job)
    }

    /// Update a job. When `create_invoice` is set, an invoice is raised for
    /// the job in the same transaction as the update.
    pub async fn update(&self, job_id: Uuid, input: UpdateJobInput) -> AppResult<JobUpdateResult> {
        let existing = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs WHERE id = $1",
            JOB_COLUMNS
        ))
        .bind(job_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Job".to_string()))?;

        let description = input.description.unwrap_or(existing.description);
        let status = input.status.unwrap_or(existing.status);
        let vehicle_id = input.vehicle_id.or(existing.vehicle_id);
        let technician_id = input.technician_id.or(existing.technician_id);
        let labour_cost = input.labour_cost.or(existing.labour_cost);
        let job_date = input.job_date.unwrap_or(existing.job_date);

        if description.trim().is_empty() {
            return Err(AppError::Validation {
                field: "description".to_string(),
                message: "Description is required".to_string(),
            });
        }
        validate_status(&status)?;

        let mut tx = self.db.begin().await?;

        let job = sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET vehicle_id = $1, technician_id = $2, description = $3, status = $4,
                labour_cost = $5, job_date = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(vehicle_id)
        .bind(technician_id)
        .bind(&description)
        .bind(&status)
        .bind(labour_cost)
        .bind(job_date)
        .bind(job_id)
        .fetch_one(&mut *tx)
        .await?;

        let invoice_id = if input.create_invoice {
            Some(Self::create_invoice_for_job(&mut tx, &job).await?)
        } else {
            None
        };

        tx.commit().await?;

        Ok(JobUpdateResult { job, invoice_id })
    }

    /// Delete a job. Invoices raised for it keep their copied line items and
    /// lose only the job reference.
    pub async fn delete(&self, job_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(job_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Job".to_string()));
        }

        Ok(())
    }

    /// Allocate the next invoice number for the given year, INV-YYYY-NNNN
    pub async fn next_invoice_no(
        tx: &mut Transaction<'_, Postgres>,
        year: i32,
    ) -> AppResult<String> {
        let seq = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO invoice_sequences (year, last_seq)
            VALUES ($1, 1)
            ON CONFLICT (year) DO UPDATE SET last_seq = invoice_sequences.last_seq + 1
            RETURNING last_seq
            "#,
        )
        .bind(year)
        .fetch_one(&mut **tx)
        .await?;

        Ok(format!("INV-{}-{:04}", year, seq))
    }

    /// Raise an invoice for a job. The labour cost becomes the single line
    /// item; aggregates are stored so readers need not re-sum.
    async fn create_invoice_for_job(
        tx: &mut Transaction<'_, Postgres>,
        job: &Job,
    ) -> AppResult<Uuid> {
        let already_invoiced = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM invoices WHERE job_id = $1)",
        )
        .bind(job.id)
        .fetch_one(&mut **tx)
        .await?;

        if already_invoiced {
            return Err(AppError::DuplicateEntry(
                "An invoice already exists for this job".to_string(),
            ));
        }

        let today = Utc::now().date_naive();
        let invoice_no = Self::next_invoice_no(tx, today.year()).await?;

        let labour = job.labour_cost.unwrap_or(Decimal::ZERO);

        let invoice_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO invoices
                (invoice_no, job_id, invoice_date, payment_status,
                 items_total, total_charges, total_deductions, final_total)
            VALUES ($1, $2, $3, 'unpaid', $4, 0, 0, $4)
            RETURNING id
            "#,
        )
        .bind(&invoice_no)
        .bind(job.id)
        .bind(today)
        .bind(labour)
        .fetch_one(&mut **tx)
        .await?;

        if labour > Decimal::ZERO {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (invoice_id, item_name, quantity, unit_price, line_total)
                VALUES ($1, $2, 1, $3, $3)
                "#,
            )
            .bind(invoice_id)
            .bind(format!("Labour: {}", job.description))
            .bind(labour)
            .execute(&mut **tx)
            .await?;
        }

        Ok(invoice_id)
    }
}
