//! HTTP API layer.
//!
//! Axum routes, handlers, DTOs, the JWT extractor, and the WebSocket
//! upgrade. All routes are mounted under `/api`, with `/ws` alongside.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
