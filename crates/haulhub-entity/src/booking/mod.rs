//! Booking entity.

pub mod model;
pub mod snapshot;
pub mod status;

pub use model::Booking;
pub use snapshot::ShipmentSnapshot;
pub use status::BookingStatus;
