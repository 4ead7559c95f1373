//! Connection lifecycle primitives.

pub mod handle;
pub mod pool;
