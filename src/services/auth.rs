//! Access token issuing and validation (HS256 JWT).
//!
//! Login and user management live outside this service; tokens are minted
//! by the identity provider or, for automation, with [`issue_token`].

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRole;

/// JWT claims carried by access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub role: UserRole,
    /// Service tokens act on behalf of automation, not a person.
    #[serde(default)]
    pub service: bool,
    pub exp: i64,
    pub iat: i64,
}

/// Mint a signed access token.
pub fn issue_token(
    subject: &str,
    user_id: Option<Uuid>,
    role: UserRole,
    service: bool,
    jwt_secret: &str,
    expiry_secs: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: subject.to_string(),
        user_id: user_id.map(|id| id.to_string()),
        role,
        service,
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "JWT validation failed");
            AppError::Unauthorized
        })
}
