//! Booking lifecycle status and transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle states of a booking.
///
/// `Pending` and `Approved` are the *active* states: at most one booking
/// per shipment may hold either at any time, and a booking that has left
/// them never re-enters (a new booking request is made instead).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status")]
pub enum BookingStatus {
    /// Created by a booking request, awaiting an admin decision.
    Pending,
    /// Accepted by an admin; the shipment goes in transit.
    Approved,
    /// Declined by an admin. Terminal.
    Rejected,
    /// Fulfilled after approval. Terminal.
    Completed,
    /// Withdrawn by the owner or an admin. Terminal.
    Cancelled,
}

impl BookingStatus {
    /// Whether this status holds the shipment's booking slot.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// Once a booking is in a terminal non-active state it never re-enters
    /// the active set.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        match (self, next) {
            (Self::Pending, Self::Approved)
            | (Self::Pending, Self::Rejected)
            | (Self::Pending, Self::Cancelled)
            | (Self::Approved, Self::Completed)
            | (Self::Approved, Self::Cancelled) => true,
            _ => false,
        }
    }

    /// Return the status as its canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = haulhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(haulhub_core::AppError::validation(format!(
                "Invalid booking status: '{s}'. Expected one of: \
                 Pending, Approved, Rejected, Completed, Cancelled"
            ))),
        }
    }
}
