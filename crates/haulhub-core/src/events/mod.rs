//! Domain event payloads shared between the service and realtime layers.
//!
//! These are the wire-level shapes pushed to connected clients; the
//! realtime hub serializes them verbatim.

pub mod booking;

pub use booking::ShipmentBookingStatus;
