//! Booking entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::snapshot::ShipmentSnapshot;
use super::status::BookingStatus;

/// A carrier's claim on a shipment slot.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier (storage key).
    pub id: Uuid,
    /// Human-readable code (`U10001`, ...). Assigned once after the row is
    /// persisted; immutable thereafter. `None` only in the brief window
    /// between insert and code assignment.
    pub code: Option<String>,
    /// The shipment this booking claims.
    pub shipment_id: Uuid,
    /// The requesting carrier.
    pub user_id: Uuid,
    /// Carrier display name, denormalized for history and code seeding.
    pub user_name: String,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Shipment fields captured at booking time.
    pub details: Json<ShipmentSnapshot>,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Whether this booking currently holds its shipment's slot.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Display code, falling back to a truncated storage key for the rare
    /// booking that never received one.
    pub fn display_code(&self) -> String {
        match &self.code {
            Some(code) => code.clone(),
            None => {
                let hex = self.id.simple().to_string();
                hex[hex.len() - 6..].to_uppercase()
            }
        }
    }
}
