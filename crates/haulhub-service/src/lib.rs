//! Business logic services.
//!
//! Services orchestrate repositories and the realtime broadcaster. They
//! talk to persistence through the traits in [`store`], which lets the
//! admission logic run against in-memory doubles under test while the
//! server wires in the Postgres repositories.

pub mod booking;
pub mod context;
pub mod notification;
pub mod shipment;
pub mod store;

pub use context::RequestContext;
