//! Customer tag management and assignment.

use crate::auth::BusinessContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use prenoto_core::models::{CreateTagRequest, CustomerTag};
use prenoto_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v1/tags",
    tag = "tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = CustomerTag),
        (status = 409, description = "Tag name already in use", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(business_id = %ctx.business_id))]
pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    ValidatedJson(request): ValidatedJson<CreateTagRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let tag = state
        .db
        .tag_repository
        .create(ctx.business_id, &request)
        .await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

#[utoipa::path(
    get,
    path = "/api/v1/tags",
    tag = "tags",
    responses((status = 200, description = "Tags, alphabetical", body = [CustomerTag]))
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id))]
pub async fn list_tags(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let tags = state.db.tag_repository.list(ctx.business_id).await?;

    Ok(Json(tags))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tags/{id}",
    tag = "tags",
    params(("id" = Uuid, Path, description = "Tag ID")),
    responses(
        (status = 204, description = "Tag deleted with its assignments"),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id, tag_id = %id))]
pub async fn delete_tag(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted = state.db.tag_repository.delete(ctx.business_id, id).await?;

    if !deleted {
        return Err(AppError::NotFound("Tag not found".to_string()).into());
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/v1/customers/{customer_id}/tags/{tag_id}",
    tag = "tags",
    params(
        ("customer_id" = Uuid, Path, description = "Customer ID"),
        ("tag_id" = Uuid, Path, description = "Tag ID")
    ),
    responses(
        (status = 204, description = "Tag assigned"),
        (status = 404, description = "Customer or tag not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id, customer_id = %customer_id, tag_id = %tag_id))]
pub async fn assign_tag(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path((customer_id, tag_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, HttpAppError> {
    state
        .db
        .tag_repository
        .assign(ctx.business_id, customer_id, tag_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/v1/customers/{customer_id}/tags/{tag_id}",
    tag = "tags",
    params(
        ("customer_id" = Uuid, Path, description = "Customer ID"),
        ("tag_id" = Uuid, Path, description = "Tag ID")
    ),
    responses(
        (status = 204, description = "Tag removed"),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id, customer_id = %customer_id, tag_id = %tag_id))]
pub async fn unassign_tag(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path((customer_id, tag_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let removed = state
        .db
        .tag_repository
        .unassign(ctx.business_id, customer_id, tag_id)
        .await?;

    if !removed {
        return Err(AppError::NotFound("Assignment not found".to_string()).into());
    }

    Ok(StatusCode::NO_CONTENT)
}
