//! Route handlers, grouped by domain.

pub mod booking;
pub mod health;
pub mod notification;
pub mod shipment;
pub mod ws;
