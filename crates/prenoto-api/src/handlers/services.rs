//! Service catalog management.

use crate::auth::BusinessContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use prenoto_core::models::{CreateServiceRequest, Service, UpdateServiceRequest};
use prenoto_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v1/services",
    tag = "services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = Service),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(business_id = %ctx.business_id))]
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    ValidatedJson(request): ValidatedJson<CreateServiceRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if request.price.is_sign_negative() {
        return Err(AppError::InvalidInput("Price cannot be negative".to_string()).into());
    }

    let service = state
        .db
        .service_repository
        .create(ctx.business_id, &request)
        .await?;

    Ok((StatusCode::CREATED, Json(service)))
}

#[utoipa::path(
    get,
    path = "/api/v1/services",
    tag = "services",
    responses((status = 200, description = "All services, active or not", body = [Service]))
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id))]
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let services = state
        .db
        .service_repository
        .list(ctx.business_id, false)
        .await?;

    Ok(Json(services))
}

#[utoipa::path(
    put,
    path = "/api/v1/services/{id}",
    tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service updated", body = Service),
        (status = 404, description = "Service not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(business_id = %ctx.business_id, service_id = %id))]
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateServiceRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if request.price.is_some_and(|p| p.is_sign_negative()) {
        return Err(AppError::InvalidInput("Price cannot be negative".to_string()).into());
    }

    let service = state
        .db
        .service_repository
        .update(ctx.business_id, id, &request)
        .await?;

    Ok(Json(service))
}

#[utoipa::path(
    delete,
    path = "/api/v1/services/{id}",
    tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Service deactivated"),
        (status = 404, description = "Service not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id, service_id = %id))]
pub async fn deactivate_service(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deactivated = state
        .db
        .service_repository
        .deactivate(ctx.business_id, id)
        .await?;

    if !deactivated {
        return Err(AppError::NotFound("Service not found".to_string()).into());
    }

    Ok(StatusCode::NO_CONTENT)
}
