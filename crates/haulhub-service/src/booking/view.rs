//! API-facing booking view with resolved shipment and carrier.

use serde::{Deserialize, Serialize};

use haulhub_entity::booking::Booking;
use haulhub_entity::shipment::Shipment;
use haulhub_entity::user::User;

/// Carrier contact fields exposed alongside a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierSummary {
    /// Display name.
    pub name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Vehicle registration number.
    pub vehicle_number: Option<String>,
}

impl From<&User> for CarrierSummary {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            phone: user.phone.clone(),
            vehicle_number: user.vehicle_number.clone(),
        }
    }
}

/// A booking with its live shipment and carrier resolved.
///
/// Resolution is best effort: a deleted shipment or user leaves the
/// corresponding field `None`, and the embedded snapshot in the booking
/// keeps the view readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingView {
    /// The booking record itself.
    #[serde(flatten)]
    pub booking: Booking,
    /// The live shipment, when it still exists.
    pub shipment: Option<Shipment>,
    /// The carrier's contact details, when the user still exists.
    pub carrier: Option<CarrierSummary>,
}

impl BookingView {
    /// A view with nothing resolved.
    pub fn bare(booking: Booking) -> Self {
        Self {
            booking,
            shipment: None,
            carrier: None,
        }
    }
}
