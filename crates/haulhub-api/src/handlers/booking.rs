//! Booking endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use haulhub_service::booking::BookingView;

use crate::dto::{
    ApiResponse, BookingListQuery, CreateBookingRequest, MessageResponse,
    UpdateBookingStatusRequest,
};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/bookings — request a booking on a shipment.
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingView>>), ApiError> {
    let view = state.bookings.create_booking(&user, body.shipment_id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(view))))
}

/// GET /api/bookings — list bookings visible to the caller.
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<ApiResponse<Vec<BookingView>>>, ApiError> {
    let views = state
        .bookings
        .list_bookings(&user, query.user_id, query.status)
        .await?;
    Ok(Json(ApiResponse::ok(views)))
}

/// GET /api/bookings/{id} — fetch one booking.
pub async fn get_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingView>>, ApiError> {
    let view = state.bookings.get_booking(&user, id).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// PUT /api/bookings/{id} — admin status transition.
pub async fn update_booking_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBookingStatusRequest>,
) -> Result<Json<ApiResponse<BookingView>>, ApiError> {
    let view = state.bookings.update_status(&user, id, body.status).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// DELETE /api/bookings/{id} — withdraw a booking.
pub async fn delete_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.bookings.delete_booking(&user, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Booking deleted"))))
}
