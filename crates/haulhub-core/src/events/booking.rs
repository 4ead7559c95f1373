//! Booking-related event payloads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derived availability signal for a shipment, broadcast to every connected
/// client whenever the set of active bookings for that shipment changes.
///
/// This is not a stored field on the shipment: it is recomputed from the
/// presence or absence of an active booking at emit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentBookingStatus {
    /// The shipment whose availability changed.
    pub shipment_id: Uuid,
    /// Whether an active booking currently holds the slot.
    pub is_booked: bool,
    /// Display name of the user holding the slot, if any.
    pub booked_by: Option<String>,
    /// Status of the holding booking, if any.
    pub booking_status: Option<String>,
}

impl ShipmentBookingStatus {
    /// Payload for a shipment whose slot is taken.
    pub fn booked(shipment_id: Uuid, booked_by: String, booking_status: String) -> Self {
        Self {
            shipment_id,
            is_booked: true,
            booked_by: Some(booked_by),
            booking_status: Some(booking_status),
        }
    }

    /// Payload for a shipment whose slot is free again.
    pub fn available(shipment_id: Uuid) -> Self {
        Self {
            shipment_id,
            is_booked: false,
            booked_by: None,
            booking_status: None,
        }
    }
}
