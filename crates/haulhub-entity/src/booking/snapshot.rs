//! Denormalized shipment snapshot embedded in a booking.

use serde::{Deserialize, Serialize};

use crate::shipment::{Shipment, ShipmentStatus};

/// Value object capturing the shipment's route, cargo, and price fields at
/// the instant a booking was created.
///
/// Deliberate anti-normalization: the snapshot keeps booking history
/// readable after the shipment is edited or deleted. It is written once at
/// admission time and never refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentSnapshot {
    /// Route origin at booking time.
    pub origin: String,
    /// Route destination at booking time.
    pub destination: String,
    /// Vehicle type at booking time.
    pub vehicle_type: String,
    /// Cargo description at booking time.
    pub load: String,
    /// Cargo weight at booking time.
    pub weight: f64,
    /// Offered price at booking time.
    pub price: f64,
    /// Shipment status at booking time.
    pub status: ShipmentStatus,
}

impl ShipmentSnapshot {
    /// Capture a snapshot from the current shipment state.
    pub fn capture(shipment: &Shipment) -> Self {
        Self {
            origin: shipment.origin.clone(),
            destination: shipment.destination.clone(),
            vehicle_type: shipment.vehicle_type.clone(),
            load: shipment.load.clone(),
            weight: shipment.weight,
            price: shipment.price,
            status: shipment.status,
        }
    }
}
