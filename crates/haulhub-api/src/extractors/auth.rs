//! `AuthUser` extractor: validates the bearer JWT and injects context.
//!
//! Tokens are issued by the external identity service; this layer only
//! verifies them against the shared HMAC secret.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use haulhub_core::config::AuthConfig;
use haulhub_core::error::AppError;
use haulhub_entity::user::UserRole;
use haulhub_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Claims carried by the identity service's access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// Display name.
    pub name: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Role.
    pub role: UserRole,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Issuer.
    #[serde(default)]
    pub iss: Option<String>,
}

/// Decode and validate an access token.
pub fn decode_token(config: &AuthConfig, token: &str) -> Result<AccessClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = config.leeway_seconds;
    if !config.issuer.is_empty() {
        validation.set_issuer(&[&config.issuer]);
    }

    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| AppError::with_source(haulhub_core::error::ErrorKind::Authentication, "Invalid token", e))?;

    Ok(data.claims)
}

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = decode_token(&state.config.auth, token)?;

        Ok(AuthUser(RequestContext::new(
            claims.sub,
            claims.role,
            claims.name,
            claims.phone,
        )))
    }
}
