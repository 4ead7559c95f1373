//! Booking repository.
//!
//! The insert path is the authoritative race-breaker for booking admission:
//! the `uq_bookings_active_shipment` partial unique index guarantees at most
//! one active booking per shipment, and this repository translates the
//! resulting unique violations into typed conflicts tagged with the
//! violated constraint namespace. Callers never inspect raw database
//! errors to decide which business rule tripped.

use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use haulhub_core::error::{AppError, ErrorKind};
use haulhub_core::result::AppResult;
use haulhub_entity::booking::{Booking, BookingStatus, ShipmentSnapshot};

/// Which unique constraint a conflicting write tripped.
///
/// The shipment-activity and code namespaces are distinct failure classes:
/// the former means the booking itself is a duplicate, the latter only that
/// a candidate code was taken and code assignment should be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictNamespace {
    /// `uq_bookings_active_shipment`: another active booking holds the slot.
    ShipmentActivity,
    /// `uq_bookings_active_user_shipment`: this user already holds the slot.
    UserShipment,
    /// `uq_bookings_code`: the candidate booking code is taken.
    Code,
}

/// Result of attempting to persist a new active booking.
#[derive(Debug)]
pub enum InsertOutcome {
    /// The row was committed; the caller won the race.
    Created(Booking),
    /// A unique constraint rejected the row.
    Conflict(ConflictNamespace),
}

/// Result of attempting to assign a code to a persisted booking.
#[derive(Debug)]
pub enum CodeAssignment {
    /// The code was written.
    Assigned(Booking),
    /// The candidate code is already taken; try the next candidate.
    CodeTaken,
    /// The booking already carries a code (assigned once, never changed).
    AlreadyAssigned(Booking),
}

/// Fields required to create a booking row.
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// The shipment being claimed.
    pub shipment_id: Uuid,
    /// The requesting carrier.
    pub user_id: Uuid,
    /// Carrier display name, denormalized.
    pub user_name: String,
    /// Shipment fields captured at this instant.
    pub details: ShipmentSnapshot,
}

/// Repository for booking rows.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attempt to persist a new `Pending` booking.
    ///
    /// Exactly one of N concurrent attempts for the same shipment observes
    /// `Created`; the rest observe `Conflict`. The row is inserted without
    /// a code — code assignment is a separate step with its own constraint
    /// namespace.
    pub async fn insert_active(&self, new: &NewBooking) -> AppResult<InsertOutcome> {
        let result = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (shipment_id, user_id, user_name, status, details) \
             VALUES ($1, $2, $3, 'Pending', $4) RETURNING *",
        )
        .bind(new.shipment_id)
        .bind(new.user_id)
        .bind(&new.user_name)
        .bind(Json(&new.details))
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(booking) => Ok(InsertOutcome::Created(booking)),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Ok(InsertOutcome::Conflict(classify_constraint(db.constraint())))
            }
            Err(e) => Err(AppError::with_source(
                ErrorKind::Database,
                "Failed to insert booking",
                e,
            )),
        }
    }

    /// Assign a code to a booking that does not have one yet.
    ///
    /// The `code IS NULL` guard makes assignment first-write-wins, so a
    /// code can never be overwritten once set.
    pub async fn assign_code(&self, booking_id: Uuid, code: &str) -> AppResult<CodeAssignment> {
        let result = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET code = $2, updated_at = NOW() \
             WHERE id = $1 AND code IS NULL RETURNING *",
        )
        .bind(booking_id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(booking)) => Ok(CodeAssignment::Assigned(booking)),
            Ok(None) => {
                // Row missing or code already set; re-read to tell which.
                let existing = self.find_by_id(booking_id).await?.ok_or_else(|| {
                    AppError::not_found(format!("Booking not found: {booking_id}"))
                })?;
                Ok(CodeAssignment::AlreadyAssigned(existing))
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Ok(CodeAssignment::CodeTaken)
            }
            Err(e) => Err(AppError::with_source(
                ErrorKind::Database,
                "Failed to assign booking code",
                e,
            )),
        }
    }

    /// Find a booking by its storage key.
    pub async fn find_by_id(&self, booking_id: Uuid) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find booking", e))
    }

    /// Find the active booking holding a shipment's slot, if any.
    pub async fn find_active_for_shipment(&self, shipment_id: Uuid) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE shipment_id = $1 AND status IN ('Pending', 'Approved')",
        )
        .bind(shipment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active booking", e)
        })
    }

    /// Count active bookings for a shipment (used by the post-delete
    /// availability re-check).
    pub async fn count_active_for_shipment(&self, shipment_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings \
             WHERE shipment_id = $1 AND status IN ('Pending', 'Approved')",
        )
        .bind(shipment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count active bookings", e)
        })
    }

    /// Count bookings whose code starts with the given initial letter.
    pub async fn count_code_prefix(&self, initial: char) -> AppResult<i64> {
        let prefix = format!("{initial}%");
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE code LIKE $1")
            .bind(prefix)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count code prefix", e)
            })
    }

    /// Check whether a booking code is already taken.
    pub async fn code_exists(&self, code: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM bookings WHERE code = $1)")
            .bind(code)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check booking code", e)
            })
    }

    /// List bookings, newest first, optionally filtered by user and status.
    pub async fn list(
        &self,
        user_id: Option<Uuid>,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE ($1::uuid IS NULL OR user_id = $1) \
               AND ($2::booking_status IS NULL OR status = $2) \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list bookings", e))
    }

    /// List every booking ever made for a shipment, newest first.
    pub async fn list_for_shipment(&self, shipment_id: Uuid) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE shipment_id = $1 ORDER BY created_at DESC",
        )
        .bind(shipment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list shipment bookings", e)
        })
    }

    /// Update a booking's lifecycle status.
    pub async fn update_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(booking_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update booking status", e)
        })
    }

    /// Delete a booking row. Returns `true` if a row was removed.
    pub async fn delete(&self, booking_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(booking_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete booking", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}

/// Map a violated unique constraint name to its namespace.
///
/// An unnamed or unrecognized unique violation on this table is treated as
/// a shipment-activity conflict: that is the widest constraint and the
/// safe interpretation for admission.
fn classify_constraint(constraint: Option<&str>) -> ConflictNamespace {
    match constraint {
        Some("uq_bookings_active_user_shipment") => ConflictNamespace::UserShipment,
        Some("uq_bookings_code") => ConflictNamespace::Code,
        _ => ConflictNamespace::ShipmentActivity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_constraints() {
        assert_eq!(
            classify_constraint(Some("uq_bookings_active_shipment")),
            ConflictNamespace::ShipmentActivity
        );
        assert_eq!(
            classify_constraint(Some("uq_bookings_active_user_shipment")),
            ConflictNamespace::UserShipment
        );
        assert_eq!(
            classify_constraint(Some("uq_bookings_code")),
            ConflictNamespace::Code
        );
    }

    #[test]
    fn test_unknown_constraint_defaults_to_shipment_activity() {
        assert_eq!(
            classify_constraint(None),
            ConflictNamespace::ShipmentActivity
        );
        assert_eq!(
            classify_constraint(Some("some_legacy_index")),
            ConflictNamespace::ShipmentActivity
        );
    }
}
