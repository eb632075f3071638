//! Technician handlers

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::technician::{Technician, TechnicianService};
use crate::AppState;

/// List active technicians
pub async fn list_technicians(State(state): State<AppState>) -> AppResult<Json<Vec<Technician>>> {
    let service = TechnicianService::new(state.db);
    let technicians = service.list().await?;
    Ok(Json(technicians))
}
