//! Request and response data-transfer objects.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
