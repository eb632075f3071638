//! Notification handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::services::notification::{Notification, NotificationService, UnreadCount};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub marked: u64,
}

/// List notifications, refreshing low-stock alerts
pub async fn list_notifications(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Notification>>> {
    let service = NotificationService::new(state.db);
    let notifications = service.list().await?;
    Ok(Json(notifications))
}

/// Count unread notifications
pub async fn unread_count(State(state): State<AppState>) -> AppResult<Json<UnreadCount>> {
    let service = NotificationService::new(state.db);
    let count = service.unread_count().await?;
    Ok(Json(count))
}

/// Mark every notification read
pub async fn mark_all_read(State(state): State<AppState>) -> AppResult<Json<MarkAllReadResponse>> {
    let service = NotificationService::new(state.db);
    let marked = service.mark_all_read().await?;
    Ok(Json(MarkAllReadResponse { marked }))
}
