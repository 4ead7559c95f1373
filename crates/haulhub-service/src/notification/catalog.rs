//! Notification message catalog.
//!
//! Every notification carries three renderings: a literal `message` for
//! clients without a translation layer, a `msg_key` into the frontend
//! translation catalog, and the `params` needed to render that key.

use serde_json::json;
use uuid::Uuid;

use haulhub_database::repositories::notification::NewNotification;
use haulhub_entity::booking::BookingStatus;
use haulhub_entity::notification::{NotificationAudience, NotificationPriority, ToastKind};

/// Admin alert for a freshly admitted booking request.
pub fn admin_booking_requested(
    user_name: &str,
    phone: Option<&str>,
    origin: &str,
    destination: &str,
    booking_code: &str,
    booking_id: Uuid,
    shipment_id: Uuid,
) -> NewNotification {
    let phone = phone.unwrap_or("No phone");
    NewNotification {
        audience: NotificationAudience::Admin,
        user_id: None,
        kind: "booking".to_string(),
        title: "New Booking Request".to_string(),
        message: format!(
            "{user_name} ({phone}) has requested to book shipment {origin} to {destination}. \
             Booking ID: {booking_code}"
        ),
        msg_key: Some("notifications.admin.newBookingRequest".to_string()),
        params: Some(json!({
            "userName": user_name,
            "phone": phone,
            "origin": origin,
            "destination": destination,
            "bookingId": booking_code,
        })),
        priority: NotificationPriority::High,
        notification_type: ToastKind::Info,
        related_booking_id: Some(booking_id),
        related_shipment_id: Some(shipment_id),
    }
}

/// Confirmation to the carrier that their request was admitted.
pub fn user_booking_requested(
    user_id: Uuid,
    origin: &str,
    destination: &str,
    booking_code: &str,
    booking_id: Uuid,
    shipment_id: Uuid,
) -> NewNotification {
    NewNotification {
        audience: NotificationAudience::User,
        user_id: Some(user_id),
        kind: "booking".to_string(),
        title: "Booking Request Sent Successfully".to_string(),
        message: format!(
            "Your booking request for shipment {origin} to {destination} has been sent \
             successfully. Booking ID: {booking_code}. Status: Pending approval."
        ),
        msg_key: Some("notifications.user.bookingRequestSent".to_string()),
        params: Some(json!({
            "origin": origin,
            "destination": destination,
            "bookingId": booking_code,
        })),
        priority: NotificationPriority::Medium,
        notification_type: ToastKind::Success,
        related_booking_id: Some(booking_id),
        related_shipment_id: Some(shipment_id),
    }
}

/// Carrier notification for an admin-driven status transition.
pub fn user_booking_status_changed(
    user_id: Uuid,
    status: BookingStatus,
    origin: &str,
    destination: &str,
    booking_code: &str,
    booking_id: Uuid,
    shipment_id: Uuid,
) -> NewNotification {
    let (message, msg_key) = match status {
        BookingStatus::Approved => (
            format!(
                "Your booking has been approved! Shipment: {origin} to {destination}. \
                 Booking ID: {booking_code}. The shipment is now in transit."
            ),
            "notifications.user.bookingApproved",
        ),
        BookingStatus::Rejected => (
            format!(
                "Your booking request has been rejected. Shipment: {origin} to {destination}. \
                 Booking ID: {booking_code}."
            ),
            "notifications.user.bookingRejected",
        ),
        BookingStatus::Cancelled => (
            format!(
                "Your booking has been cancelled. Shipment: {origin} to {destination}. \
                 Booking ID: {booking_code}."
            ),
            "notifications.user.bookingCancelled",
        ),
        BookingStatus::Completed => (
            format!(
                "Your booking has been completed successfully! Shipment: {origin} to \
                 {destination}. Booking ID: {booking_code}."
            ),
            "notifications.user.bookingCompleted",
        ),
        BookingStatus::Pending => (
            format!(
                "Your booking status has been updated to pending. Shipment: {origin} to \
                 {destination}. Booking ID: {booking_code}."
            ),
            "notifications.user.bookingStatusUpdated",
        ),
    };

    let priority = match status {
        BookingStatus::Approved => NotificationPriority::High,
        BookingStatus::Rejected => NotificationPriority::Medium,
        _ => NotificationPriority::Low,
    };

    let notification_type = match status {
        BookingStatus::Approved | BookingStatus::Completed => ToastKind::Success,
        BookingStatus::Rejected => ToastKind::Error,
        BookingStatus::Cancelled => ToastKind::Warning,
        BookingStatus::Pending => ToastKind::Info,
    };

    NewNotification {
        audience: NotificationAudience::User,
        user_id: Some(user_id),
        kind: "booking".to_string(),
        title: format!("Booking {status}"),
        message,
        msg_key: Some(msg_key.to_string()),
        params: Some(json!({
            "origin": origin,
            "destination": destination,
            "bookingId": booking_code,
            "status": status.to_string().to_lowercase(),
        })),
        priority,
        notification_type,
        related_booking_id: Some(booking_id),
        related_shipment_id: Some(shipment_id),
    }
}
