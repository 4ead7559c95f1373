//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use haulhub_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Extracted by middleware and passed into service methods so that every
/// operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's role at the time the JWT was issued.
    pub role: UserRole,
    /// Display name (convenience field from JWT claims).
    pub user_name: String,
    /// Contact phone (convenience field from JWT claims).
    pub phone: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, role: UserRole, user_name: String, phone: Option<String>) -> Self {
        Self {
            user_id,
            role,
            user_name,
            phone,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// Uppercased first letter of the display name, used as the booking
    /// code prefix. Falls back to `'U'` for empty or non-alphabetic names.
    pub fn code_initial(&self) -> char {
        self.user_name
            .chars()
            .next()
            .and_then(|c| {
                let upper = c.to_ascii_uppercase();
                upper.is_ascii_uppercase().then_some(upper)
            })
            .unwrap_or('U')
    }
}
