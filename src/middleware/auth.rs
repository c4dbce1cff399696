//! JWT authentication extractor for Axum handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRole;
use crate::services::auth as auth_service;
use crate::AppState;

/// Authenticated caller extracted from a JWT Bearer token.
///
/// Service tokens carry no user id.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Option<Uuid>,
    pub subject: String,
    pub role: UserRole,
    pub service: bool,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let claims = auth_service::validate_token(token, &state.config.jwt_secret)?;

        let id = claims
            .user_id
            .as_deref()
            .map(str::parse::<Uuid>)
            .transpose()
            .map_err(|_| AppError::Unauthorized)?;

        if id.is_none() && !claims.service {
            return Err(AppError::Unauthorized);
        }

        Ok(CurrentUser {
            id,
            subject: claims.sub,
            role: claims.role,
            service: claims.service,
        })
    }
}
