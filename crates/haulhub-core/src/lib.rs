//! # haulhub-core
//!
//! Core crate for HaulHub. Contains configuration schemas, domain event
//! payloads, the realtime broadcaster trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other HaulHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
