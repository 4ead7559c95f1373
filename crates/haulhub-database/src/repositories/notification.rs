//! Notification repository.

use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use haulhub_core::error::{AppError, ErrorKind};
use haulhub_core::result::AppResult;
use haulhub_entity::notification::{
    Notification, NotificationAudience, NotificationPriority, ToastKind,
};

/// Fields required to create a notification record.
#[derive(Debug, Clone)]
pub struct NewNotification {
    /// Admin-facing or user-facing.
    pub audience: NotificationAudience,
    /// Recipient when `audience` is `User`.
    pub user_id: Option<Uuid>,
    /// Classification of the triggering event.
    pub kind: String,
    /// Short headline.
    pub title: String,
    /// Literal fallback message.
    pub message: String,
    /// Translation template key.
    pub msg_key: Option<String>,
    /// Template parameters.
    pub params: Option<serde_json::Value>,
    /// Urgency.
    pub priority: NotificationPriority,
    /// Toast styling hint.
    pub notification_type: ToastKind,
    /// Related booking, if any.
    pub related_booking_id: Option<Uuid>,
    /// Related shipment, if any.
    pub related_shipment_id: Option<Uuid>,
}

/// Repository for notification records.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a notification record.
    pub async fn create(&self, new: &NewNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications \
             (audience, user_id, kind, title, message, msg_key, params, priority, \
              notification_type, related_booking_id, related_shipment_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(new.audience)
        .bind(new.user_id)
        .bind(&new.kind)
        .bind(&new.title)
        .bind(&new.message)
        .bind(&new.msg_key)
        .bind(new.params.as_ref().map(Json))
        .bind(new.priority)
        .bind(new.notification_type)
        .bind(new.related_booking_id)
        .bind(new.related_shipment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
        })
    }

    /// Find a notification by its storage key.
    pub async fn find_by_id(&self, notification_id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(notification_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find notification", e)
            })
    }

    /// List user-facing notifications for a recipient, newest first.
    pub async fn find_for_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE audience = 'user' AND user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list user notifications", e)
        })
    }

    /// List the shared admin inbox, newest first.
    pub async fn find_for_admins(&self) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE audience = 'admin' ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list admin notifications", e)
        })
    }

    /// Count unread user-facing notifications for a recipient.
    pub async fn count_unread_for_user(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications \
             WHERE audience = 'user' AND user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    /// Mark a single notification as read. The `read` flag is the only
    /// mutable field on the record.
    pub async fn mark_read(&self, notification_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
            .bind(notification_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all of a user's notifications as read. Returns the count.
    pub async fn mark_all_read_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE \
             WHERE audience = 'user' AND user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    /// Mark the entire admin inbox as read. Returns the count.
    pub async fn mark_all_read_for_admins(&self) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE \
             WHERE audience = 'admin' AND is_read = FALSE",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    /// Delete a single notification record.
    pub async fn delete(&self, notification_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(notification_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Bulk-purge a user's notifications. Returns the count removed.
    pub async fn purge_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE audience = 'user' AND user_id = $1")
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to purge notifications", e)
                })?;
        Ok(result.rows_affected())
    }

    /// Bulk-purge the admin inbox. Returns the count removed.
    pub async fn purge_for_admins(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE audience = 'admin'")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge admin inbox", e)
            })?;
        Ok(result.rows_affected())
    }
}
