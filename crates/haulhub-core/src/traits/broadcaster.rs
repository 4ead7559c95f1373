//! Realtime fan-out seam.
//!
//! Services push booking and notification events through this trait rather
//! than holding a handle to the concrete WebSocket hub. The hub implements
//! it in `haulhub-realtime`; tests substitute a recording fake.
//!
//! Delivery is fire-and-forget and at-most-once: every method returns `()`,
//! and implementations must swallow (and log) per-connection send failures.
//! Clients reconcile by re-fetching on reconnect, not by replaying events.

use async_trait::async_trait;
use uuid::Uuid;

use crate::events::ShipmentBookingStatus;

/// Push-side interface of the realtime layer.
#[async_trait]
pub trait RealtimeBroadcaster: Send + Sync {
    /// Deliver a freshly persisted user notification to its recipient.
    async fn emit_user_notification(&self, user_id: Uuid, notification: serde_json::Value);

    /// Deliver a freshly persisted admin notification to the admin room.
    async fn emit_admin_notification(&self, notification: serde_json::Value);

    /// Push a booking state change to the booking owner and the admin room.
    async fn emit_booking_update(&self, owner_id: Uuid, booking: serde_json::Value);

    /// Push an edited shipment to every connected client.
    async fn emit_shipment_update(&self, shipment: serde_json::Value);

    /// Broadcast a shipment availability change to every connected client.
    async fn emit_shipment_booking_status(&self, status: ShipmentBookingStatus);
}
