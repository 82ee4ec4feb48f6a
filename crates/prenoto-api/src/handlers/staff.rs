//! Staff management.

use crate::auth::BusinessContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use prenoto_core::models::{CreateStaffRequest, StaffMember, UpdateStaffRequest};
use prenoto_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v1/staff",
    tag = "staff",
    request_body = CreateStaffRequest,
    responses(
        (status = 201, description = "Staff member created", body = StaffMember),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(business_id = %ctx.business_id))]
pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    ValidatedJson(request): ValidatedJson<CreateStaffRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let member = state
        .db
        .staff_repository
        .create(ctx.business_id, &request)
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

#[utoipa::path(
    get,
    path = "/api/v1/staff",
    tag = "staff",
    responses((status = 200, description = "All staff members", body = [StaffMember]))
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id))]
pub async fn list_staff(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let members = state.db.staff_repository.list(ctx.business_id, false).await?;

    Ok(Json(members))
}

#[utoipa::path(
    put,
    path = "/api/v1/staff/{id}",
    tag = "staff",
    params(("id" = Uuid, Path, description = "Staff member ID")),
    request_body = UpdateStaffRequest,
    responses(
        (status = 200, description = "Staff member updated", body = StaffMember),
        (status = 404, description = "Staff member not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(business_id = %ctx.business_id, staff_id = %id))]
pub async fn update_staff(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateStaffRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let member = state
        .db
        .staff_repository
        .update(ctx.business_id, id, &request)
        .await?;

    Ok(Json(member))
}

#[utoipa::path(
    delete,
    path = "/api/v1/staff/{id}",
    tag = "staff",
    params(("id" = Uuid, Path, description = "Staff member ID")),
    responses(
        (status = 204, description = "Staff member deactivated"),
        (status = 404, description = "Staff member not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id, staff_id = %id))]
pub async fn deactivate_staff(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deactivated = state
        .db
        .staff_repository
        .deactivate(ctx.business_id, id)
        .await?;

    if !deactivated {
        return Err(AppError::NotFound("Staff member not found".to_string()).into());
    }

    Ok(StatusCode::NO_CONTENT)
}
