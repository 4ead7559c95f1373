//! Notification inbox endpoints.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use haulhub_entity::notification::Notification;

use crate::dto::{AffectedCountResponse, ApiResponse, MessageResponse, UnreadCountResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications — the caller's inbox, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<Notification>>>, ApiError> {
    let notifications = state.notifications.list_for_user(&user).await?;
    Ok(Json(ApiResponse::ok(notifications)))
}

/// GET /api/notifications/admin — the shared admin feed (admin only).
pub async fn list_admin_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<Notification>>>, ApiError> {
    let notifications = state.notifications.list_for_admins(&user).await?;
    Ok(Json(ApiResponse::ok(notifications)))
}

/// GET /api/notifications/unread-count — badge counter.
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<UnreadCountResponse>>, ApiError> {
    let count = state.notifications.unread_count(&user).await?;
    Ok(Json(ApiResponse::ok(UnreadCountResponse { count })))
}

/// PATCH /api/notifications/{id}/read — mark one notification read.
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Notification>>, ApiError> {
    let notification = state.notifications.mark_read(&user, id).await?;
    Ok(Json(ApiResponse::ok(notification)))
}

/// PATCH /api/notifications/read-all — mark the caller's inbox read.
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<AffectedCountResponse>>, ApiError> {
    let affected = state.notifications.mark_all_read(&user).await?;
    Ok(Json(ApiResponse::ok(AffectedCountResponse { affected })))
}

/// PATCH /api/notifications/admin/read-all — mark the admin feed read.
pub async fn mark_all_admin_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<AffectedCountResponse>>, ApiError> {
    let affected = state.notifications.mark_all_read_for_admins(&user).await?;
    Ok(Json(ApiResponse::ok(AffectedCountResponse { affected })))
}

/// DELETE /api/notifications/{id} — delete one notification.
pub async fn delete_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.notifications.delete(&user, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Notification deleted",
    ))))
}

/// DELETE /api/notifications — clear the caller's inbox.
pub async fn purge_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<AffectedCountResponse>>, ApiError> {
    let affected = state.notifications.purge(&user).await?;
    Ok(Json(ApiResponse::ok(AffectedCountResponse { affected })))
}

/// DELETE /api/notifications/admin — clear the admin feed (admin only).
pub async fn purge_admin_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<AffectedCountResponse>>, ApiError> {
    let affected = state.notifications.purge_for_admins(&user).await?;
    Ok(Json(ApiResponse::ok(AffectedCountResponse { affected })))
}
