use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use chrono::{Duration, Utc};
use prenoto_core::models::Business;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure. Tokens are issued by the external identity
/// provider; this service only verifies them.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// User id (identity-provider subject)
    pub sub: Uuid,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued-at timestamp
    pub iat: i64,
}

impl JwtClaims {
    pub fn new(user_id: Uuid, expiry_hours: i64) -> Self {
        let now = Utc::now();
        JwtClaims {
            sub: user_id,
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Mint an HS256 token for the given user. Used by tooling and tests; the
/// production issuer lives outside this service.
pub fn encode_token(
    secret: &str,
    user_id: Uuid,
    expiry_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &JwtClaims::new(user_id, expiry_hours),
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Authenticated user, before business resolution. The registration
/// endpoint is the only consumer; everything else wants [`BusinessContext`].
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Authenticated user resolved to their business, stored in request
/// extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct BusinessContext {
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub business: Business,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().copied().ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(
                    "Missing authentication",
                    "UNAUTHORIZED",
                )),
            )
        })
    }
}

impl<S> FromRequestParts<S> for BusinessContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<BusinessContext>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::FORBIDDEN,
                    Json(ErrorResponse::new(
                        "No business registered for this account",
                        "NO_BUSINESS",
                    )),
                )
            })
    }
}
