//! Shipment repository.

use sqlx::PgPool;
use uuid::Uuid;

use haulhub_core::error::{AppError, ErrorKind};
use haulhub_core::result::AppResult;
use haulhub_entity::shipment::{Shipment, ShipmentStatus};

/// Fields required to create a shipment row.
#[derive(Debug, Clone)]
pub struct NewShipment {
    /// Route origin.
    pub origin: String,
    /// Route destination.
    pub destination: String,
    /// Required vehicle type.
    pub vehicle_type: String,
    /// Cargo description.
    pub load: String,
    /// Cargo weight in kilograms.
    pub weight: f64,
    /// Offered price.
    pub price: f64,
    /// Scheduled pickup date.
    pub pickup_date: chrono::DateTime<chrono::Utc>,
    /// The publishing admin.
    pub created_by: Uuid,
}

/// Repository for shipment rows.
#[derive(Debug, Clone)]
pub struct ShipmentRepository {
    pool: PgPool,
}

impl ShipmentRepository {
    /// Create a new shipment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new shipment in `Pending` status, without a code.
    pub async fn insert(&self, new: &NewShipment) -> AppResult<Shipment> {
        sqlx::query_as::<_, Shipment>(
            "INSERT INTO shipments \
             (origin, destination, vehicle_type, load, weight, price, pickup_date, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&new.origin)
        .bind(&new.destination)
        .bind(&new.vehicle_type)
        .bind(&new.load)
        .bind(new.weight)
        .bind(new.price)
        .bind(new.pickup_date)
        .bind(new.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert shipment", e))
    }

    /// Assign a code to a shipment that does not have one yet.
    ///
    /// Returns `false` if the candidate code is already taken (unique
    /// violation) so the caller can probe the next free slot.
    pub async fn assign_code(&self, shipment_id: Uuid, code: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE shipments SET code = $2, updated_at = NOW() \
             WHERE id = $1 AND code IS NULL",
        )
        .bind(shipment_id)
        .bind(code)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Database,
                "Failed to assign shipment code",
                e,
            )),
        }
    }

    /// All shipment codes matching the `SH<number>` convention.
    pub async fn existing_codes(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT code FROM shipments WHERE code ~ '^SH[0-9]+$'")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list shipment codes", e)
            })
    }

    /// Find a shipment by its storage key.
    pub async fn find_by_id(&self, shipment_id: Uuid) -> AppResult<Option<Shipment>> {
        sqlx::query_as::<_, Shipment>("SELECT * FROM shipments WHERE id = $1")
            .bind(shipment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find shipment", e))
    }

    /// List all shipments, newest first.
    pub async fn list(&self) -> AppResult<Vec<Shipment>> {
        sqlx::query_as::<_, Shipment>("SELECT * FROM shipments ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shipments", e))
    }

    /// Update a shipment's editable fields.
    pub async fn update(&self, shipment: &Shipment) -> AppResult<Shipment> {
        sqlx::query_as::<_, Shipment>(
            "UPDATE shipments SET origin = $2, destination = $3, vehicle_type = $4, \
             load = $5, weight = $6, price = $7, pickup_date = $8, status = $9, \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(shipment.id)
        .bind(&shipment.origin)
        .bind(&shipment.destination)
        .bind(&shipment.vehicle_type)
        .bind(&shipment.load)
        .bind(shipment.weight)
        .bind(shipment.price)
        .bind(shipment.pickup_date)
        .bind(shipment.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update shipment", e))
    }

    /// Update only a shipment's lifecycle status.
    pub async fn update_status(
        &self,
        shipment_id: Uuid,
        status: ShipmentStatus,
    ) -> AppResult<Shipment> {
        sqlx::query_as::<_, Shipment>(
            "UPDATE shipments SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(shipment_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update shipment status", e)
        })
    }

    /// Delete a shipment row. Returns `true` if a row was removed.
    pub async fn delete(&self, shipment_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM shipments WHERE id = $1")
            .bind(shipment_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete shipment", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
