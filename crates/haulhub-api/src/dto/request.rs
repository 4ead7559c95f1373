//! Request body and query-string types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use haulhub_entity::booking::BookingStatus;
use haulhub_entity::shipment::ShipmentStatus;

/// Body for `POST /api/bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// The shipment to book.
    pub shipment_id: Uuid,
}

/// Body for `PUT /api/bookings/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    /// Target status.
    pub status: BookingStatus,
}

/// Query string for `GET /api/bookings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    /// Filter by owner (admins only; ignored for carriers).
    pub user_id: Option<Uuid>,
    /// Filter by status.
    pub status: Option<BookingStatus>,
}

/// Body for `POST /api/shipments`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentRequest {
    /// Route origin.
    #[validate(length(min = 1, message = "origin is required"))]
    pub origin: String,
    /// Route destination.
    #[validate(length(min = 1, message = "destination is required"))]
    pub destination: String,
    /// Required vehicle type.
    #[validate(length(min = 1, message = "vehicleType is required"))]
    pub vehicle_type: String,
    /// Cargo description.
    #[validate(length(min = 1, message = "load is required"))]
    pub load: String,
    /// Cargo weight in kilograms.
    #[validate(range(min = 0.0, message = "weight must not be negative"))]
    pub weight: f64,
    /// Offered price.
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    /// Scheduled pickup date.
    pub pickup_date: DateTime<Utc>,
}

/// Body for `PUT /api/shipments/{id}`. Carries the full editable set.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShipmentRequest {
    #[validate(length(min = 1, message = "origin is required"))]
    pub origin: String,
    #[validate(length(min = 1, message = "destination is required"))]
    pub destination: String,
    #[validate(length(min = 1, message = "vehicleType is required"))]
    pub vehicle_type: String,
    #[validate(length(min = 1, message = "load is required"))]
    pub load: String,
    #[validate(range(min = 0.0, message = "weight must not be negative"))]
    pub weight: f64,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    pub pickup_date: DateTime<Utc>,
}

/// Body for `PATCH /api/shipments/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateShipmentStatusRequest {
    /// Target status.
    pub status: ShipmentStatus,
}

/// Query string for `GET /ws`.
#[derive(Debug, Clone, Deserialize)]
pub struct WsQuery {
    /// Access token; WebSocket clients cannot set headers from browsers.
    pub token: String,
}
