//! Notification service
//!
//! Currently carries low-stock alerts. The scan is run on read: each item
//! at or below its reorder level gets one unread notification, deduplicated
//! against any open unread alert for the same item.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::InventoryService;

pub const LOW_STOCK: &str = "low_stock";

/// Notification service
#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
}

/// Notification record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub entity_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Unread count response
#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List notifications, newest first, refreshing low-stock alerts first
    pub async fn list(&self) -> AppResult<Vec<Notification>> {
        self.check_low_stock().await?;

        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, notification_type, title, message, entity_id, is_read, created_at
            FROM notifications
            ORDER BY created_at DESC
            LIMIT 100
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(notifications)
    }

    /// Count unread notifications
    pub async fn unread_count(&self) -> AppResult<UnreadCount> {
        let unread =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE NOT is_read")
                .fetch_one(&self.db)
                .await?;

        Ok(UnreadCount { unread })
    }

    /// Mark every notification read
    pub async fn mark_all_read(&self) -> AppResult<u64> {
        let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE NOT is_read")
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }

    /// Scan inventory and raise an alert for each newly low item. An item
    /// with an open unread alert is skipped until that alert is read.
    pub async fn check_low_stock(&self) -> AppResult<u64> {
        let low_items = InventoryService::new(self.db.clone()).list_low_stock().await?;

        let mut raised = 0;
        for view in low_items {
            let item = &view.item;

            let already_open = sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM notifications
                    WHERE notification_type = $1 AND entity_id = $2 AND NOT is_read
                )
                "#,
            )
            .bind(LOW_STOCK)
            .bind(item.id)
            .fetch_one(&self.db)
            .await?;

            if already_open {
                continue;
            }

            sqlx::query(
                r#"
                INSERT INTO notifications (notification_type, title, message, entity_id)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(LOW_STOCK)
            .bind("Low stock")
            .bind(format!(
                "{} is down to {} (reorder at {})",
                item.name,
                item.quantity,
                item.reorder_level.unwrap_or_default()
            ))
            .bind(item.id)
            .execute(&self.db)
            .await?;

            tracing::info!(item = %item.name, quantity = %item.quantity, "low stock alert raised");
            raised += 1;
        }

        Ok(raised)
    }
}
