//! Shipment CRUD, code assignment, and availability projection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use haulhub_core::error::AppError;
use haulhub_core::result::AppResult;
use haulhub_core::traits::RealtimeBroadcaster;
use haulhub_database::repositories::shipment::NewShipment;
use haulhub_entity::booking::{Booking, BookingStatus};
use haulhub_entity::shipment::{Shipment, ShipmentStatus};

use crate::booking::code;
use crate::context::RequestContext;
use crate::store::{BookingStore, ShipmentStore};

/// Rounds of code probing before leaving a shipment codeless.
const CODE_ASSIGN_ROUNDS: usize = 10;

/// A shipment with its derived availability.
///
/// Availability is never stored on the shipment row; it is recomputed
/// from the presence of an active booking at read time, so it can never
/// drift from the bookings table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentSummary {
    /// The shipment record.
    #[serde(flatten)]
    pub shipment: Shipment,
    /// Whether an active booking holds the slot.
    pub is_booked: bool,
    /// Display name of the slot holder, if any.
    pub booked_by: Option<String>,
}

/// Detail view: the shipment, its booking history, and counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentDetails {
    /// The shipment record.
    pub shipment: Shipment,
    /// Every booking ever made for it, newest first.
    pub bookings: Vec<Booking>,
    /// Total bookings.
    pub total_bookings: usize,
    /// Bookings awaiting a decision.
    pub pending_bookings: usize,
    /// Approved bookings.
    pub approved_bookings: usize,
}

/// Manages the shipment catalog.
#[derive(Clone)]
pub struct ShipmentService {
    shipments: Arc<dyn ShipmentStore>,
    bookings: Arc<dyn BookingStore>,
    broadcaster: Arc<dyn RealtimeBroadcaster>,
}

impl ShipmentService {
    /// Creates a new shipment service.
    pub fn new(
        shipments: Arc<dyn ShipmentStore>,
        bookings: Arc<dyn BookingStore>,
        broadcaster: Arc<dyn RealtimeBroadcaster>,
    ) -> Self {
        Self {
            shipments,
            bookings,
            broadcaster,
        }
    }

    /// Publish a new shipment (admin only) and assign its code.
    pub async fn create_shipment(
        &self,
        ctx: &RequestContext,
        new: NewShipment,
    ) -> AppResult<Shipment> {
        self.require_admin(ctx)?;

        let shipment = self.shipments.insert(&new).await?;
        info!(shipment_id = %shipment.id, "Shipment created");

        let shipment = self.assign_shipment_code(shipment).await;

        match serde_json::to_value(&shipment) {
            Ok(payload) => self.broadcaster.emit_shipment_update(payload).await,
            Err(e) => warn!(error = %e, "Failed to serialize shipment"),
        }

        Ok(shipment)
    }

    /// List all shipments with derived availability, newest first.
    pub async fn list_shipments(&self) -> AppResult<Vec<ShipmentSummary>> {
        let shipments = self.shipments.list().await?;
        let mut summaries = Vec::with_capacity(shipments.len());
        for shipment in shipments {
            let active = self.bookings.find_active_for_shipment(shipment.id).await?;
            summaries.push(ShipmentSummary {
                shipment,
                is_booked: active.is_some(),
                booked_by: active.map(|b| b.user_name),
            });
        }
        Ok(summaries)
    }

    /// Get one shipment with derived availability.
    pub async fn get_shipment(&self, shipment_id: Uuid) -> AppResult<ShipmentSummary> {
        let shipment = self
            .shipments
            .find_by_id(shipment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shipment not found"))?;
        let active = self.bookings.find_active_for_shipment(shipment_id).await?;
        Ok(ShipmentSummary {
            shipment,
            is_booked: active.is_some(),
            booked_by: active.map(|b| b.user_name),
        })
    }

    /// Get one shipment with its full booking history and counts.
    pub async fn get_shipment_details(&self, shipment_id: Uuid) -> AppResult<ShipmentDetails> {
        let shipment = self
            .shipments
            .find_by_id(shipment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shipment not found"))?;
        let bookings = self.bookings.list_for_shipment(shipment_id).await?;
        let pending = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Pending)
            .count();
        let approved = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Approved)
            .count();
        Ok(ShipmentDetails {
            shipment,
            total_bookings: bookings.len(),
            pending_bookings: pending,
            approved_bookings: approved,
            bookings,
        })
    }

    /// Update a shipment's editable fields (admin only).
    pub async fn update_shipment(
        &self,
        ctx: &RequestContext,
        shipment: &Shipment,
    ) -> AppResult<Shipment> {
        self.require_admin(ctx)?;

        let updated = self.shipments.update(shipment).await?;
        info!(shipment_id = %updated.id, "Shipment updated");

        match serde_json::to_value(&updated) {
            Ok(payload) => self.broadcaster.emit_shipment_update(payload).await,
            Err(e) => warn!(error = %e, "Failed to serialize shipment"),
        }

        Ok(updated)
    }

    /// Update only a shipment's lifecycle status (admin only).
    pub async fn update_shipment_status(
        &self,
        ctx: &RequestContext,
        shipment_id: Uuid,
        status: ShipmentStatus,
    ) -> AppResult<Shipment> {
        self.require_admin(ctx)?;

        let updated = self.shipments.update_status(shipment_id, status).await?;
        info!(shipment_id = %shipment_id, status = %status, "Shipment status updated");

        match serde_json::to_value(&updated) {
            Ok(payload) => self.broadcaster.emit_shipment_update(payload).await,
            Err(e) => warn!(error = %e, "Failed to serialize shipment"),
        }

        Ok(updated)
    }

    /// Delete a shipment (admin only). Refused while an active booking
    /// holds the slot.
    pub async fn delete_shipment(&self, ctx: &RequestContext, shipment_id: Uuid) -> AppResult<()> {
        self.require_admin(ctx)?;

        if self
            .bookings
            .find_active_for_shipment(shipment_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Shipment has an active booking and cannot be deleted",
            ));
        }

        let removed = self.shipments.delete(shipment_id).await?;
        if !removed {
            return Err(AppError::not_found("Shipment not found"));
        }
        info!(shipment_id = %shipment_id, "Shipment deleted");
        Ok(())
    }

    /// Assign the next free `SH` code, probing past races on the unique
    /// index. Sequential assignment that cannot proceed degrades to a
    /// timestamp-derived code; a codeless shipment is tolerable, a
    /// failed create is not.
    async fn assign_shipment_code(&self, shipment: Shipment) -> Shipment {
        for _ in 0..CODE_ASSIGN_ROUNDS {
            let candidate = match self.shipments.existing_codes().await {
                Ok(codes) => match code::next_shipment_code(&codes) {
                    Some(candidate) => candidate,
                    None => break,
                },
                Err(e) => {
                    warn!(error = %e, shipment_id = %shipment.id, "Code listing failed");
                    break;
                }
            };
            match self.shipments.assign_code(shipment.id, &candidate).await {
                Ok(true) => {
                    return match self.shipments.find_by_id(shipment.id).await {
                        Ok(Some(updated)) => updated,
                        _ => shipment,
                    };
                }
                Ok(false) => continue,
                Err(e) => {
                    warn!(error = %e, shipment_id = %shipment.id, "Code assignment failed");
                    break;
                }
            }
        }
        self.assign_fallback_code(shipment).await
    }

    /// Last resort: a single timestamp-derived code outside the
    /// sequence.
    async fn assign_fallback_code(&self, shipment: Shipment) -> Shipment {
        let candidate = code::fallback_shipment_code();
        match self.shipments.assign_code(shipment.id, &candidate).await {
            Ok(true) => match self.shipments.find_by_id(shipment.id).await {
                Ok(Some(updated)) => updated,
                _ => shipment,
            },
            Ok(false) => {
                warn!(
                    shipment_id = %shipment.id,
                    code = %candidate,
                    "Fallback code taken; shipment left without a code"
                );
                shipment
            }
            Err(e) => {
                warn!(error = %e, shipment_id = %shipment.id, "Shipment left without a code");
                shipment
            }
        }
    }

    fn require_admin(&self, ctx: &RequestContext) -> AppResult<()> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin role required"));
        }
        Ok(())
    }
}
