//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use haulhub_core::error::{AppError, ErrorKind};
use haulhub_service::booking::AdmissionError;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// HTTP-facing error. Handlers return this; `?` converts domain errors
/// through the `From` impls below.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl ApiError {
    /// Build an error with an explicit status and code.
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Attach a details payload.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse {
            error: self.code,
            message: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status = match err.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization => {
                tracing::error!(error = %err, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        // Storage details never leave the server.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            err.message.clone()
        };
        Self::new(status, err.kind.to_string(), message)
    }
}

impl From<AdmissionError> for ApiError {
    fn from(err: AdmissionError) -> Self {
        match err {
            AdmissionError::ShipmentNotFound(id) => Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("Shipment not found: {id}"),
            ),
            AdmissionError::ShipmentNotBookable => Self::new(
                StatusCode::BAD_REQUEST,
                "SHIPMENT_UNAVAILABLE",
                "Shipment is not available for booking",
            ),
            AdmissionError::DuplicateUserBooking => Self::new(
                StatusCode::BAD_REQUEST,
                "DUPLICATE_USER_BOOKING",
                "You already have a booking for this shipment",
            ),
            AdmissionError::DuplicateBooking { booked_by } => {
                let mut api = Self::new(
                    StatusCode::BAD_REQUEST,
                    "DUPLICATE_BOOKING",
                    "This shipment is already booked by another user",
                );
                if let Some(name) = booked_by {
                    api = api.with_details(serde_json::json!({ "bookedBy": name }));
                }
                api
            }
            AdmissionError::Internal(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_booking_carries_holder() {
        let api: ApiError = AdmissionError::DuplicateBooking {
            booked_by: Some("Dinesh".to_string()),
        }
        .into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.code, "DUPLICATE_BOOKING");
        assert_eq!(api.details, Some(serde_json::json!({"bookedBy": "Dinesh"})));
    }

    #[test]
    fn test_internal_errors_are_masked() {
        let api: ApiError = AppError::database("connection reset by peer").into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Internal server error");
    }
}
