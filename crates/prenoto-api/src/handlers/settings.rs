//! Business registration, profile, and settings.

use crate::auth::{AuthUser, BusinessContext};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use prenoto_core::models::{
    Business, BusinessSettings, RegisterBusinessRequest, UpdateBusinessRequest,
    UpdateSettingsRequest,
};
use prenoto_core::{validation, AppError};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/v1/business",
    tag = "business",
    request_body = RegisterBusinessRequest,
    responses(
        (status = 201, description = "Business registered with default settings", body = Business),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Already registered, or slug taken", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, user, request), fields(user_id = %user.user_id))]
pub async fn register_business(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(request): ValidatedJson<RegisterBusinessRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let slug = validation::slug_from_name(&request.name);
    if slug.is_empty() {
        return Err(AppError::InvalidInput(
            "Business name must contain at least one letter or digit".to_string(),
        )
        .into());
    }

    let business = state
        .db
        .business_repository
        .register(
            user.user_id,
            &request.name,
            &slug,
            &request.business_type,
            request.phone.as_deref(),
            request.city.as_deref(),
        )
        .await?;

    tracing::info!(business_id = %business.id, slug = %business.slug, "Business registered");

    Ok((StatusCode::CREATED, Json(business)))
}

#[utoipa::path(
    get,
    path = "/api/v1/business",
    tag = "business",
    responses((status = 200, description = "The caller's business", body = Business))
)]
#[tracing::instrument(skip(ctx), fields(business_id = %ctx.business_id))]
pub async fn get_business(ctx: BusinessContext) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(ctx.business))
}

#[utoipa::path(
    put,
    path = "/api/v1/business",
    tag = "business",
    request_body = UpdateBusinessRequest,
    responses(
        (status = 200, description = "Profile updated", body = Business),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(business_id = %ctx.business_id))]
pub async fn update_business(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    ValidatedJson(request): ValidatedJson<UpdateBusinessRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let business = state
        .db
        .business_repository
        .update_profile(ctx.business_id, &request)
        .await?;

    Ok(Json(business))
}

#[utoipa::path(
    get,
    path = "/api/v1/settings",
    tag = "business",
    responses((status = 200, description = "Business settings", body = BusinessSettings))
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id))]
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let settings = state.db.settings_repository.get(ctx.business_id).await?;

    Ok(Json(settings))
}

#[utoipa::path(
    put,
    path = "/api/v1/settings",
    tag = "business",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = BusinessSettings),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(business_id = %ctx.business_id))]
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    ValidatedJson(request): ValidatedJson<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let settings = state
        .db
        .settings_repository
        .update(ctx.business_id, &request)
        .await?;

    Ok(Json(settings))
}
