//! Route definitions for the HaulHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`, with the
//! WebSocket upgrade at `/ws`. The router receives `AppState` and passes
//! it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
    routing::{delete, get, patch, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(booking_routes())
        .merge(shipment_routes())
        .merge(notification_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_handler));

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Booking admission and lifecycle endpoints.
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(handlers::booking::create_booking))
        .route("/bookings", get(handlers::booking::list_bookings))
        .route("/bookings/{id}", get(handlers::booking::get_booking))
        .route(
            "/bookings/{id}",
            put(handlers::booking::update_booking_status),
        )
        .route("/bookings/{id}", delete(handlers::booking::delete_booking))
}

/// Shipment catalog endpoints.
fn shipment_routes() -> Router<AppState> {
    Router::new()
        .route("/shipments", post(handlers::shipment::create_shipment))
        .route("/shipments", get(handlers::shipment::list_shipments))
        .route("/shipments/{id}", get(handlers::shipment::get_shipment))
        .route(
            "/shipments/{id}/details",
            get(handlers::shipment::get_shipment_details),
        )
        .route("/shipments/{id}", put(handlers::shipment::update_shipment))
        .route(
            "/shipments/{id}/status",
            patch(handlers::shipment::update_shipment_status),
        )
        .route(
            "/shipments/{id}",
            delete(handlers::shipment::delete_shipment),
        )
}

/// Notification inbox endpoints.
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/admin",
            get(handlers::notification::list_admin_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/{id}/read",
            patch(handlers::notification::mark_read),
        )
        .route(
            "/notifications/read-all",
            patch(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/admin/read-all",
            patch(handlers::notification::mark_all_admin_read),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notification::delete_notification),
        )
        .route(
            "/notifications",
            delete(handlers::notification::purge_notifications),
        )
        .route(
            "/notifications/admin",
            delete(handlers::notification::purge_admin_notifications),
        )
}

/// Health check endpoints (no auth required).
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Build the CORS layer from configuration.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if cors_config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = cors_config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}
