//! Booking admission, lifecycle, and code generation.

pub mod code;
pub mod service;
pub mod view;

pub use service::{AdmissionError, BookingService};
pub use view::{BookingView, CarrierSummary};
