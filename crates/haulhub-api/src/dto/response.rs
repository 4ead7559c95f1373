//! Response envelope types.

use serde::{Deserialize, Serialize};

/// Standard success envelope wrapping a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true` for success responses.
    pub success: bool,
    /// The payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in the success envelope.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Plain message payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Unread-notification counter payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    /// Unread notifications for the caller.
    pub count: i64,
}

/// Bulk-operation counter payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffectedCountResponse {
    /// Rows touched by the operation.
    pub affected: u64,
}
