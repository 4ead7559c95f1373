//! Shipment endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use haulhub_core::error::AppError;
use haulhub_database::repositories::shipment::NewShipment;
use haulhub_entity::shipment::Shipment;
use haulhub_service::shipment::{ShipmentDetails, ShipmentSummary};

use crate::dto::{
    ApiResponse, CreateShipmentRequest, MessageResponse, UpdateShipmentRequest,
    UpdateShipmentStatusRequest,
};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

fn validation_error(e: validator::ValidationErrors) -> ApiError {
    AppError::validation(e.to_string()).into()
}

/// POST /api/shipments — publish a shipment (admin only).
pub async fn create_shipment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CreateShipmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Shipment>>), ApiError> {
    body.validate().map_err(validation_error)?;

    let new = NewShipment {
        origin: body.origin,
        destination: body.destination,
        vehicle_type: body.vehicle_type,
        load: body.load,
        weight: body.weight,
        price: body.price,
        pickup_date: body.pickup_date,
        created_by: user.user_id,
    };
    let shipment = state.shipments.create_shipment(&user, new).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(shipment))))
}

/// GET /api/shipments — list shipments with availability.
pub async fn list_shipments(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<Vec<ShipmentSummary>>>, ApiError> {
    let shipments = state.shipments.list_shipments().await?;
    Ok(Json(ApiResponse::ok(shipments)))
}

/// GET /api/shipments/{id} — one shipment with availability.
pub async fn get_shipment(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ShipmentSummary>>, ApiError> {
    let shipment = state.shipments.get_shipment(id).await?;
    Ok(Json(ApiResponse::ok(shipment)))
}

/// GET /api/shipments/{id}/details — shipment with booking history.
pub async fn get_shipment_details(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ShipmentDetails>>, ApiError> {
    let details = state.shipments.get_shipment_details(id).await?;
    Ok(Json(ApiResponse::ok(details)))
}

/// PUT /api/shipments/{id} — replace editable fields (admin only).
pub async fn update_shipment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateShipmentRequest>,
) -> Result<Json<ApiResponse<Shipment>>, ApiError> {
    body.validate().map_err(validation_error)?;

    let existing = state.shipments.get_shipment(id).await?.shipment;
    let shipment = Shipment {
        origin: body.origin,
        destination: body.destination,
        vehicle_type: body.vehicle_type,
        load: body.load,
        weight: body.weight,
        price: body.price,
        pickup_date: body.pickup_date,
        ..existing
    };
    let updated = state.shipments.update_shipment(&user, &shipment).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// PATCH /api/shipments/{id}/status — lifecycle transition (admin only).
pub async fn update_shipment_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateShipmentStatusRequest>,
) -> Result<Json<ApiResponse<Shipment>>, ApiError> {
    let updated = state
        .shipments
        .update_shipment_status(&user, id, body.status)
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// DELETE /api/shipments/{id} — remove a shipment (admin only).
pub async fn delete_shipment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.shipments.delete_shipment(&user, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Shipment deleted",
    ))))
}
