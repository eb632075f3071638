//! Vehicle handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::vehicle::{CreateVehicleInput, UpdateVehicleInput, Vehicle, VehicleService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VehicleQuery {
    pub customer_id: Option<Uuid>,
}

/// List vehicles, optionally for one customer
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(query): Query<VehicleQuery>,
) -> AppResult<Json<Vec<Vehicle>>> {
    let service = VehicleService::new(state.db);
    let vehicles = service.list(query.customer_id).await?;
    Ok(Json(vehicles))
}

/// Create a vehicle
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(input): Json<CreateVehicleInput>,
) -> AppResult<(StatusCode, Json<Vehicle>)> {
    let service = VehicleService::new(state.db);
    let vehicle = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// Update a vehicle
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    Json(input): Json<UpdateVehicleInput>,
) -> AppResult<Json<Vehicle>> {
    let service = VehicleService::new(state.db);
    let vehicle = service.update(vehicle_id, input).await?;
    Ok(Json(vehicle))
}

/// Delete a vehicle
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = VehicleService::new(state.db);
    service.delete(vehicle_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
