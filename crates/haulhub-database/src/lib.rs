//! # haulhub-database
//!
//! PostgreSQL connection management, migrations, and repository
//! implementations for HaulHub.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
