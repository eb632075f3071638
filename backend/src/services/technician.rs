//! Technician roster service
//!
//! Read-only through the API; the roster is managed by migration or direct
//! administration.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;

/// Technician service
#[derive(Clone)]
pub struct TechnicianService {
    db: PgPool,
}

/// Technician record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Technician {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TechnicianService {
    /// Create a new TechnicianService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List active technicians
    pub async fn list(&self) -> AppResult<Vec<Technician>> {
        let technicians = sqlx::query_as::<_, Technician>(
            r#"
            SELECT id, name, phone, specialty, is_active, created_at
            FROM technicians
            WHERE is_active = TRUE
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(technicians)
    }
}
