//! Quote management.

use crate::auth::BusinessContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use prenoto_core::models::{
    CreateQuoteRequest, Quote, QuoteStatus, QuoteWithItems, UpdateQuoteStatusRequest,
};
use prenoto_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct QuoteListQuery {
    #[serde(default)]
    pub status: Option<QuoteStatus>,
}

#[utoipa::path(
    post,
    path = "/api/v1/quotes",
    tag = "quotes",
    request_body = CreateQuoteRequest,
    responses(
        (status = 201, description = "Quote created as draft", body = QuoteWithItems),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, ctx, request),
    fields(business_id = %ctx.business_id, item_count = request.items.len())
)]
pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    ValidatedJson(request): ValidatedJson<CreateQuoteRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if request
        .items
        .iter()
        .any(|item| item.unit_price.is_sign_negative())
    {
        return Err(AppError::InvalidInput("Unit prices cannot be negative".to_string()).into());
    }

    let quote = state
        .db
        .quote_repository
        .create_with_items(ctx.business_id, Utc::now().date_naive(), &request)
        .await?;

    let items = state.db.quote_repository.items(quote.id).await?;

    Ok((StatusCode::CREATED, Json(QuoteWithItems { quote, items })))
}

#[utoipa::path(
    get,
    path = "/api/v1/quotes",
    tag = "quotes",
    params(QuoteListQuery),
    responses((status = 200, description = "Quotes, newest first", body = [Quote]))
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id))]
pub async fn list_quotes(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Query(query): Query<QuoteListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let quotes = state
        .db
        .quote_repository
        .list(ctx.business_id, query.status)
        .await?;

    Ok(Json(quotes))
}

#[utoipa::path(
    get,
    path = "/api/v1/quotes/{id}",
    tag = "quotes",
    params(("id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote with items", body = QuoteWithItems),
        (status = 404, description = "Quote not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id, quote_id = %id))]
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let quote = state
        .db
        .quote_repository
        .get(ctx.business_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quote not found".to_string()))?;

    let items = state.db.quote_repository.items(quote.id).await?;

    Ok(Json(QuoteWithItems { quote, items }))
}

#[utoipa::path(
    put,
    path = "/api/v1/quotes/{id}/status",
    tag = "quotes",
    params(("id" = Uuid, Path, description = "Quote ID")),
    request_body = UpdateQuoteStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Quote),
        (status = 404, description = "Quote not found", body = ErrorResponse),
        (status = 409, description = "Transition not allowed", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, ctx, request),
    fields(business_id = %ctx.business_id, quote_id = %id, requested_status = %request.status)
)]
pub async fn update_quote_status(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateQuoteStatusRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let current = state
        .db
        .quote_repository
        .get(ctx.business_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quote not found".to_string()))?;

    current.status.validate_transition(request.status)?;

    let quote = state
        .db
        .quote_repository
        .update_status(ctx.business_id, id, current.status, request.status)
        .await?;

    Ok(Json(quote))
}

#[utoipa::path(
    delete,
    path = "/api/v1/quotes/{id}",
    tag = "quotes",
    params(("id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 204, description = "Draft deleted"),
        (status = 404, description = "No deletable draft with this ID", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id, quote_id = %id))]
pub async fn delete_quote(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted = state
        .db
        .quote_repository
        .delete_draft(ctx.business_id, id)
        .await?;

    if !deleted {
        return Err(AppError::NotFound(
            "Quote not found, or is no longer a draft".to_string(),
        )
        .into());
    }

    Ok(StatusCode::NO_CONTENT)
}
