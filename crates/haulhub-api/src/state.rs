//! Shared application state threaded through every handler.

use std::sync::Arc;

use haulhub_core::config::AppConfig;
use haulhub_database::DatabasePool;
use haulhub_realtime::RealtimeHub;
use haulhub_service::booking::BookingService;
use haulhub_service::notification::NotificationService;
use haulhub_service::shipment::ShipmentService;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Database pool, for health checks.
    pub db: Arc<DatabasePool>,
    /// Booking admission and lifecycle.
    pub bookings: BookingService,
    /// Shipment catalog.
    pub shipments: ShipmentService,
    /// Notification inbox operations.
    pub notifications: NotificationService,
    /// WebSocket hub.
    pub hub: Arc<RealtimeHub>,
}
