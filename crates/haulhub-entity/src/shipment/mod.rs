//! Shipment entity.

pub mod model;
pub mod status;

pub use model::Shipment;
pub use status::ShipmentStatus;
