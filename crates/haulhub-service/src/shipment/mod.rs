//! Shipment catalog management.

pub mod service;

pub use service::{ShipmentDetails, ShipmentService, ShipmentSummary};
