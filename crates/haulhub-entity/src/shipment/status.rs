//! Shipment lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle states of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "shipment_status")]
pub enum ShipmentStatus {
    /// Published with a future pickup date.
    Scheduled,
    /// Published and open for booking.
    Pending,
    /// A booking was approved; the shipment is on the road.
    InTransit,
    /// Held at a warehouse between legs.
    AtWarehouse,
    /// Delivered to its destination.
    Delivered,
    /// Cancelled by the owning admin.
    Cancelled,
}

impl ShipmentStatus {
    /// Whether the shipment can still accept booking requests.
    ///
    /// Delivered and cancelled shipments are closed; every other state is
    /// bookable as far as the shipment itself is concerned (the active
    /// booking constraint is checked separately).
    pub fn is_bookable(&self) -> bool {
        !matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Return the status as its canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Pending => "Pending",
            Self::InTransit => "InTransit",
            Self::AtWarehouse => "AtWarehouse",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ShipmentStatus {
    type Err = haulhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Scheduled" => Ok(Self::Scheduled),
            "Pending" => Ok(Self::Pending),
            "InTransit" => Ok(Self::InTransit),
            "AtWarehouse" => Ok(Self::AtWarehouse),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(haulhub_core::AppError::validation(format!(
                "Invalid shipment status: '{s}'"
            ))),
        }
    }
}
