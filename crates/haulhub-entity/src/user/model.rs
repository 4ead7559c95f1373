//! User entity model.
//!
//! Account creation and credential handling belong to the identity
//! service; HaulHub only reads user rows to resolve booking requesters
//! and scope notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A registered user (admin or carrier).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name; also seeds the booking code initial.
    pub name: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Carrier vehicle registration number.
    pub vehicle_number: Option<String>,
    /// Role.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Uppercased first letter of the display name, used as the booking
    /// code prefix. Falls back to `'U'` for empty or non-alphabetic names.
    pub fn code_initial(&self) -> char {
        self.name
            .chars()
            .next()
            .and_then(|c| {
                let upper = c.to_ascii_uppercase();
                upper.is_ascii_uppercase().then_some(upper)
            })
            .unwrap_or('U')
    }
}
