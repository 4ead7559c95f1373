//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_audience", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationAudience {
    /// All admin-role users (shared inbox).
    Admin,
    /// A single user, identified by `user_id`.
    User,
}

/// Relative urgency, used for inbox ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    /// Informational only.
    Low,
    /// Worth surfacing promptly.
    Medium,
    /// Requires attention.
    High,
}

/// Toast styling hint for the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "toast_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    /// Positive outcome.
    Success,
    /// Failure outcome.
    Error,
    /// Caution.
    Warning,
    /// Neutral information.
    Info,
}

/// A durable notification record.
///
/// Created only as a side effect of booking/shipment state transitions.
/// Immutable except for the `is_read` flag; removed only by explicit
/// per-item or bulk purge.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// Admin-facing or user-facing.
    pub audience: NotificationAudience,
    /// Recipient when `audience` is `User`; `None` for the admin inbox.
    pub user_id: Option<Uuid>,
    /// Classification of the triggering event (`"booking"`, `"shipment"`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Short headline.
    pub title: String,
    /// Literal fallback message (English).
    pub message: String,
    /// Translation template key, so clients can re-render the message in
    /// any locale without a new record.
    pub msg_key: Option<String>,
    /// Parameters for the translation template.
    pub params: Option<Json<serde_json::Value>>,
    /// Urgency.
    pub priority: NotificationPriority,
    /// Toast styling hint.
    pub notification_type: ToastKind,
    /// The booking that caused this notification, if any.
    pub related_booking_id: Option<Uuid>,
    /// The shipment that caused this notification, if any.
    pub related_shipment_id: Option<Uuid>,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_type() {
        let notification = Notification {
            id: Uuid::new_v4(),
            audience: NotificationAudience::User,
            user_id: Some(Uuid::new_v4()),
            kind: "booking".to_string(),
            title: "Booking Approved".to_string(),
            message: "Your booking has been approved!".to_string(),
            msg_key: Some("notifications.user.bookingApproved".to_string()),
            params: None,
            priority: NotificationPriority::High,
            notification_type: ToastKind::Success,
            related_booking_id: None,
            related_shipment_id: None,
            is_read: false,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&notification).expect("serialize");
        assert_eq!(json["type"], serde_json::json!("booking"));
        assert_eq!(json["notification_type"], serde_json::json!("success"));
        assert_eq!(json["priority"], serde_json::json!("high"));
    }
}
