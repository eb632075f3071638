//! Vehicle register service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::validation::validate_plate_no;

/// Vehicle service for customer vehicles
#[derive(Clone)]
pub struct VehicleService {
    db: PgPool,
}

/// Vehicle record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub plate_no: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a vehicle
#[derive(Debug, Deserialize)]
pub struct CreateVehicleInput {
    pub customer_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub plate_no: Option<String>,
}

/// Input for updating a vehicle
#[derive(Debug, Deserialize)]
pub struct UpdateVehicleInput {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub plate_no: Option<String>,
}

fn validate_vehicle(make: &str, model: &str, plate_no: Option<&str>) -> AppResult<()> {
    if make.trim().is_empty() {
        return Err(AppError::Validation {
            field: "make".to_string(),
            message: "Vehicle make is required".to_string(),
        });
    }
    if model.trim().is_empty() {
        return Err(AppError::Validation {
            field: "model".to_string(),
            message: "Vehicle model is required".to_string(),
        });
    }
    if let Some(plate) = plate_no {
        validate_plate_no(plate).map_err(|msg| AppError::Validation {
            field: "plate_no".to_string(),
            message: msg.to_string(),
        })?;
    }
    Ok(())
}

impl VehicleService {
    /// Create a new VehicleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List vehicles, optionally filtered by customer
    pub async fn list(&self, customer_id: Option<Uuid>) -> AppResult<Vec<Vehicle>> {
        let vehicles = match customer_id {
            Some(customer_id) => {
                sqlx::query_as::<_, Vehicle>(
                    r#"
                    SELECT id, customer_id, make, model, year, plate_no, created_at, updated_at
                    FROM vehicles
                    WHERE customer_id = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(customer_id)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, Vehicle>(
                    r#"
                    SELECT id, customer_id, make, model, year, plate_no, created_at, updated_at
                    FROM vehicles
                    ORDER BY created_at DESC
                    "#,
                )
                .fetch_all(&self.db)
                .await?
            }
        };

        Ok(vehicles)
    }

    /// Create a vehicle for a customer
    pub async fn create(&self, input: CreateVehicleInput) -> AppResult<Vehicle> {
        validate_vehicle(&input.make, &input.model, input.plate_no.as_deref())?;

        let customer_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
                .bind(input.customer_id)
                .fetch_one(&self.db)
                .await?;

        if !customer_exists {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (customer_id, make, model, year, plate_no)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, customer_id, make, model, year, plate_no, created_at, updated_at
            "#,
        )
        .bind(input.customer_id)
        .bind(&input.make)
        .bind(&input.model)
        .bind(input.year)
        .bind(&input.plate_no)
        .fetch_one(&self.db)
        .await?;

        Ok(vehicle)
    }

    /// Update a vehicle, keeping unspecified fields
    pub async fn update(&self, vehicle_id: Uuid, input: UpdateVehicleInput) -> AppResult<Vehicle> {
        let existing = sqlx::query_as::<_, Vehicle>(
            "SELECT id, customer_id, make, model, year, plate_no, created_at, updated_at FROM vehicles WHERE id = $1",
        )
        .bind(vehicle_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle".to_string()))?;

        let make = input.make.unwrap_or(existing.make);
        let model = input.model.unwrap_or(existing.model);
        let year = input.year.or(existing.year);
        let plate_no = input.plate_no.or(existing.plate_no);

        validate_vehicle(&make, &model, plate_no.as_deref())?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET make = $1, model = $2, year = $3, plate_no = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, customer_id, make, model, year, plate_no, created_at, updated_at
            "#,
        )
        .bind(&make)
        .bind(&model)
        .bind(year)
        .bind(&plate_no)
        .bind(vehicle_id)
        .fetch_one(&self.db)
        .await?;

        Ok(vehicle)
    }

    /// Delete a vehicle
    pub async fn delete(&self, vehicle_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(vehicle_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vehicle".to_string()));
        }

        Ok(())
    }
}
