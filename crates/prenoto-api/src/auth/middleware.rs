use crate::auth::models::{AuthUser, BusinessContext, JwtClaims};
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, Validation};
use prenoto_core::AppError;
use prenoto_db::BusinessRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: String,
    pub business_repository: BusinessRepository,
}

/// Verify the bearer token and resolve the subject to its business.
///
/// On success `AuthUser` is always attached; `BusinessContext` only when the
/// user has completed registration. Handlers pick the extractor they need.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Some(token) => token,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing Authorization header".to_string(),
            ))
            .into_response()
        }
    };

    let claims = match jsonwebtoken::decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(auth_state.jwt_secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(data) => data.claims,
        Err(err) => {
            tracing::debug!(error = %err, "JWT validation failed");
            return HttpAppError(AppError::Unauthorized("Invalid token".to_string()))
                .into_response();
        }
    };

    request.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
    });

    match auth_state
        .business_repository
        .find_by_owner(claims.sub)
        .await
    {
        Ok(Some(business)) => {
            request.extensions_mut().insert(BusinessContext {
                business_id: business.id,
                user_id: claims.sub,
                business,
            });
        }
        Ok(None) => {
            // Authenticated but not yet registered; only the registration
            // endpoint will accept this request.
        }
        Err(err) => {
            return HttpAppError(err).into_response();
        }
    }

    next.run(request).await
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
