//! Booking admission and lifecycle.
//!
//! Admission is a three-phase flow. An advisory pre-check turns the
//! common losing cases into friendly errors without consuming an insert.
//! The insert itself is the authoritative race-breaker: the partial
//! unique index on active bookings guarantees exactly one winner per
//! shipment, and a conflicting insert is reclassified by re-reading the
//! winning row. Finally, a human-readable code is assigned to the
//! committed row; code collisions retry without ever touching the
//! admission outcome.
//!
//! Notifications and realtime pushes are side effects of an already
//! committed admission. Each one is isolated: a failure is logged and
//! the admission still succeeds.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use haulhub_core::error::AppError;
use haulhub_core::events::ShipmentBookingStatus;
use haulhub_core::result::AppResult;
use haulhub_core::traits::RealtimeBroadcaster;
use haulhub_database::repositories::booking::{
    CodeAssignment, ConflictNamespace, InsertOutcome, NewBooking,
};
use haulhub_entity::booking::{Booking, BookingStatus, ShipmentSnapshot};
use haulhub_entity::shipment::ShipmentStatus;

use crate::booking::code;
use crate::booking::view::{BookingView, CarrierSummary};
use crate::context::RequestContext;
use crate::notification::NotificationService;
use crate::notification::catalog;
use crate::store::{BookingStore, ShipmentStore, UserStore};

/// Rounds of code generation before giving up and leaving the fallback
/// display code to cover the booking.
const CODE_ASSIGN_ROUNDS: usize = 3;

/// Why a booking request was turned away.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// The referenced shipment does not exist.
    #[error("Shipment not found: {0}")]
    ShipmentNotFound(Uuid),
    /// The shipment has left the bookable part of its lifecycle.
    #[error("Shipment is not available for booking")]
    ShipmentNotBookable,
    /// The caller already holds an active booking for this shipment.
    #[error("You already have a booking for this shipment")]
    DuplicateUserBooking,
    /// Another user's active booking holds the slot.
    #[error("This shipment is already booked by another user")]
    DuplicateBooking {
        /// Display name of the slot holder, when known.
        booked_by: Option<String>,
    },
    /// Infrastructure failure unrelated to the admission rules.
    #[error(transparent)]
    Internal(#[from] AppError),
}

/// Booking admission controller and lifecycle manager.
#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingStore>,
    shipments: Arc<dyn ShipmentStore>,
    users: Arc<dyn UserStore>,
    notifications: NotificationService,
    broadcaster: Arc<dyn RealtimeBroadcaster>,
}

impl BookingService {
    /// Creates a new booking service.
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        shipments: Arc<dyn ShipmentStore>,
        users: Arc<dyn UserStore>,
        notifications: NotificationService,
        broadcaster: Arc<dyn RealtimeBroadcaster>,
    ) -> Self {
        Self {
            bookings,
            shipments,
            users,
            notifications,
            broadcaster,
        }
    }

    /// Admit a booking request for a shipment.
    ///
    /// At most one of N concurrent calls for the same shipment succeeds;
    /// the rest observe a typed duplicate error.
    pub async fn create_booking(
        &self,
        ctx: &RequestContext,
        shipment_id: Uuid,
    ) -> Result<BookingView, AdmissionError> {
        let shipment = self
            .shipments
            .find_by_id(shipment_id)
            .await?
            .ok_or(AdmissionError::ShipmentNotFound(shipment_id))?;

        if !shipment.status.is_bookable() {
            return Err(AdmissionError::ShipmentNotBookable);
        }

        // Advisory pre-check. Catches the common losing cases cheaply and
        // with the holder's name attached; the insert below remains the
        // authority when two requests pass this check together.
        if let Some(active) = self.bookings.find_active_for_shipment(shipment_id).await? {
            return Err(self.duplicate_for(ctx, &active));
        }

        let new = NewBooking {
            shipment_id,
            user_id: ctx.user_id,
            user_name: ctx.user_name.clone(),
            details: ShipmentSnapshot::capture(&shipment),
        };

        let booking = match self.bookings.insert_active(&new).await? {
            InsertOutcome::Created(booking) => booking,
            InsertOutcome::Conflict(ConflictNamespace::UserShipment) => {
                return Err(AdmissionError::DuplicateUserBooking);
            }
            InsertOutcome::Conflict(_) => {
                // Lost the insert race. Re-read the winning row to tell
                // the caller whose booking holds the slot.
                return Err(self.reclassify_insert_conflict(ctx, shipment_id).await?);
            }
        };

        info!(
            booking_id = %booking.id,
            shipment_id = %shipment_id,
            user_id = %ctx.user_id,
            "Booking admitted"
        );

        let booking = self.assign_booking_code(booking, ctx.code_initial()).await;
        let view = self.resolve_view(booking).await;

        self.emit_admission_side_effects(ctx, &view).await;

        Ok(view)
    }

    /// Apply an admin-driven status transition.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
        next: BookingStatus,
    ) -> AppResult<BookingView> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin role required"));
        }

        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found"))?;

        if !booking.status.can_transition_to(next) {
            return Err(AppError::validation(format!(
                "Cannot move booking from {} to {next}",
                booking.status
            )));
        }

        let updated = self.bookings.update_status(booking_id, next).await?;
        info!(
            booking_id = %booking_id,
            from = %booking.status,
            to = %next,
            "Booking status updated"
        );

        // An approved booking puts its shipment in transit.
        if next == BookingStatus::Approved {
            if let Err(e) = self
                .shipments
                .update_status(updated.shipment_id, ShipmentStatus::InTransit)
                .await
            {
                warn!(error = %e, shipment_id = %updated.shipment_id, "Failed to move shipment in transit");
            }
        }

        let view = self.resolve_view(updated.clone()).await;

        if next.is_active() || next == BookingStatus::Completed {
            match serde_json::to_value(&view) {
                Ok(payload) => {
                    self.broadcaster
                        .emit_booking_update(updated.user_id, payload)
                        .await;
                }
                Err(e) => warn!(error = %e, "Failed to serialize booking update"),
            }
            self.broadcaster
                .emit_shipment_booking_status(ShipmentBookingStatus::booked(
                    updated.shipment_id,
                    updated.user_name.clone(),
                    next.to_string(),
                ))
                .await;
        } else {
            // Rejected or cancelled: the slot opens up again.
            self.broadcaster
                .emit_shipment_booking_status(ShipmentBookingStatus::available(
                    updated.shipment_id,
                ))
                .await;
        }

        let draft = catalog::user_booking_status_changed(
            updated.user_id,
            next,
            &updated.details.origin,
            &updated.details.destination,
            &updated.display_code(),
            updated.id,
            updated.shipment_id,
        );
        if let Err(e) = self.notifications.dispatch(draft).await {
            warn!(error = %e, booking_id = %booking_id, "Failed to dispatch status notification");
        }

        Ok(view)
    }

    /// Remove a booking. Owners may remove their own; admins any.
    pub async fn delete_booking(&self, ctx: &RequestContext, booking_id: Uuid) -> AppResult<()> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found"))?;

        if !ctx.is_admin() && booking.user_id != ctx.user_id {
            return Err(AppError::authorization("Not authorized"));
        }

        self.bookings.delete(booking_id).await?;
        info!(booking_id = %booking_id, shipment_id = %booking.shipment_id, "Booking deleted");

        // Re-check rather than assume: another active booking may exist if
        // the deleted one was already terminal.
        match self
            .bookings
            .count_active_for_shipment(booking.shipment_id)
            .await
        {
            Ok(0) => {
                self.broadcaster
                    .emit_shipment_booking_status(ShipmentBookingStatus::available(
                        booking.shipment_id,
                    ))
                    .await;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, shipment_id = %booking.shipment_id, "Failed availability re-check");
            }
        }

        Ok(())
    }

    /// Get one booking. Owners see their own; admins any.
    pub async fn get_booking(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
    ) -> AppResult<BookingView> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found"))?;

        if !ctx.is_admin() && booking.user_id != ctx.user_id {
            return Err(AppError::authorization("Not authorized"));
        }

        Ok(self.resolve_view(booking).await)
    }

    /// List bookings. Non-admins are always scoped to their own; admins
    /// may filter by user.
    pub async fn list_bookings(
        &self,
        ctx: &RequestContext,
        user_filter: Option<Uuid>,
        status_filter: Option<BookingStatus>,
    ) -> AppResult<Vec<BookingView>> {
        let user_id = if ctx.is_admin() {
            user_filter
        } else {
            Some(ctx.user_id)
        };

        let bookings = self.bookings.list(user_id, status_filter).await?;
        let mut views = Vec::with_capacity(bookings.len());
        for booking in bookings {
            views.push(self.resolve_view(booking).await);
        }
        Ok(views)
    }

    /// Map an existing active booking to the caller's duplicate error.
    fn duplicate_for(&self, ctx: &RequestContext, active: &Booking) -> AdmissionError {
        if active.user_id == ctx.user_id {
            AdmissionError::DuplicateUserBooking
        } else {
            AdmissionError::DuplicateBooking {
                booked_by: Some(active.user_name.clone()),
            }
        }
    }

    /// After losing the insert race, read the winner to produce a precise
    /// duplicate error. The winner may already be gone again; the slot was
    /// contended either way.
    async fn reclassify_insert_conflict(
        &self,
        ctx: &RequestContext,
        shipment_id: Uuid,
    ) -> Result<AdmissionError, AppError> {
        match self.bookings.find_active_for_shipment(shipment_id).await? {
            Some(active) => Ok(self.duplicate_for(ctx, &active)),
            None => Ok(AdmissionError::DuplicateBooking { booked_by: None }),
        }
    }

    /// Assign a human-readable code to a committed booking.
    ///
    /// Never fails the admission: exhausted retries or storage errors
    /// leave the booking codeless, and `display_code()` covers it.
    async fn assign_booking_code(&self, booking: Booking, initial: char) -> Booking {
        for _ in 0..CODE_ASSIGN_ROUNDS {
            let candidate = match code::next_booking_code(self.bookings.as_ref(), initial).await {
                Ok(candidate) => candidate,
                Err(e) => {
                    warn!(error = %e, booking_id = %booking.id, "Code generation failed");
                    return booking;
                }
            };
            match self.bookings.assign_code(booking.id, &candidate).await {
                Ok(CodeAssignment::Assigned(updated)) => return updated,
                Ok(CodeAssignment::AlreadyAssigned(existing)) => return existing,
                Ok(CodeAssignment::CodeTaken) => continue,
                Err(e) => {
                    warn!(error = %e, booking_id = %booking.id, "Code assignment failed");
                    return booking;
                }
            }
        }

        // Sequential probing lost every round; the timestamp code is
        // effectively collision-free.
        let fallback = code::fallback_booking_code(initial);
        match self.bookings.assign_code(booking.id, &fallback).await {
            Ok(CodeAssignment::Assigned(updated)) => updated,
            Ok(CodeAssignment::AlreadyAssigned(existing)) => existing,
            Ok(CodeAssignment::CodeTaken) | Err(_) => {
                warn!(booking_id = %booking.id, "Booking left without a code");
                booking
            }
        }
    }

    /// Resolve the live shipment and carrier for a booking, best effort.
    async fn resolve_view(&self, booking: Booking) -> BookingView {
        let shipment = match self.shipments.find_by_id(booking.shipment_id).await {
            Ok(shipment) => shipment,
            Err(e) => {
                warn!(error = %e, booking_id = %booking.id, "Failed to resolve shipment for view");
                None
            }
        };
        let carrier = match self.users.find_by_id(booking.user_id).await {
            Ok(user) => user.as_ref().map(CarrierSummary::from),
            Err(e) => {
                warn!(error = %e, booking_id = %booking.id, "Failed to resolve carrier for view");
                None
            }
        };
        BookingView {
            booking,
            shipment,
            carrier,
        }
    }

    /// Post-admission fan-out: notifications and realtime pushes, each
    /// isolated so one failure never surfaces to the caller.
    async fn emit_admission_side_effects(&self, ctx: &RequestContext, view: &BookingView) {
        let booking = &view.booking;
        let code = booking.display_code();
        let origin = &booking.details.origin;
        let destination = &booking.details.destination;

        let admin_draft = catalog::admin_booking_requested(
            &ctx.user_name,
            ctx.phone.as_deref(),
            origin,
            destination,
            &code,
            booking.id,
            booking.shipment_id,
        );
        if let Err(e) = self.notifications.dispatch(admin_draft).await {
            warn!(error = %e, booking_id = %booking.id, "Failed to dispatch admin notification");
        }

        let user_draft = catalog::user_booking_requested(
            ctx.user_id,
            origin,
            destination,
            &code,
            booking.id,
            booking.shipment_id,
        );
        if let Err(e) = self.notifications.dispatch(user_draft).await {
            warn!(error = %e, booking_id = %booking.id, "Failed to dispatch user notification");
        }

        self.broadcaster
            .emit_shipment_booking_status(ShipmentBookingStatus::booked(
                booking.shipment_id,
                ctx.user_name.clone(),
                booking.status.to_string(),
            ))
            .await;

        match serde_json::to_value(view) {
            Ok(payload) => {
                self.broadcaster
                    .emit_booking_update(ctx.user_id, payload)
                    .await;
            }
            Err(e) => warn!(error = %e, booking_id = %booking.id, "Failed to serialize booking update"),
        }
    }
}
