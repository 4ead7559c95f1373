//! # haulhub-entity
//!
//! Domain entity models for HaulHub: shipments, bookings, notifications,
//! and users, with their status enums mapped to PostgreSQL types.

pub mod booking;
pub mod notification;
pub mod shipment;
pub mod user;
