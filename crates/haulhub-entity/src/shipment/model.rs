//! Shipment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ShipmentStatus;

/// A shipment published by an admin, bookable by carriers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Shipment {
    /// Unique shipment identifier.
    pub id: Uuid,
    /// Human-readable code (`SH01`, `SH02`, ...), assigned at creation.
    pub code: Option<String>,
    /// Route origin.
    pub origin: String,
    /// Route destination.
    pub destination: String,
    /// Required vehicle type.
    pub vehicle_type: String,
    /// Cargo description.
    pub load: String,
    /// Cargo weight in kilograms.
    pub weight: f64,
    /// Offered price.
    pub price: f64,
    /// Scheduled pickup date.
    pub pickup_date: DateTime<Utc>,
    /// Lifecycle status.
    pub status: ShipmentStatus,
    /// The admin who published this shipment.
    pub created_by: Uuid,
    /// When the shipment was created.
    pub created_at: DateTime<Utc>,
    /// When the shipment was last modified.
    pub updated_at: DateTime<Utc>,
}
