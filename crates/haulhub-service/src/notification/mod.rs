//! Notification catalog and dispatch.

pub mod catalog;
pub mod service;

pub use service::NotificationService;
