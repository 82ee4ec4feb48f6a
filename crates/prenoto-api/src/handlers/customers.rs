//! Customer management (dashboard side of the CRM).

use crate::auth::BusinessContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use prenoto_core::models::{
    CreateCustomerRequest, Customer, CustomerWithTags, UpdateCustomerRequest,
};
use prenoto_core::{validation, AppError};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CustomerListQuery {
    /// Case-insensitive name match or phone substring.
    #[serde(default)]
    pub search: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/customers",
    tag = "customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Phone already registered", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(business_id = %ctx.business_id))]
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    ValidatedJson(request): ValidatedJson<CreateCustomerRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !validation::is_valid_phone(&request.phone) {
        return Err(AppError::InvalidInput(format!(
            "'{}' does not look like a phone number",
            request.phone
        ))
        .into());
    }

    let customer = state
        .db
        .customer_repository
        .create(ctx.business_id, &request)
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

#[utoipa::path(
    get,
    path = "/api/v1/customers",
    tag = "customers",
    params(CustomerListQuery),
    responses((status = 200, description = "Customers, alphabetical", body = [Customer]))
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id))]
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Query(query): Query<CustomerListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let customers = state
        .db
        .customer_repository
        .list(ctx.business_id, query.search.as_deref())
        .await?;

    Ok(Json(customers))
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    tag = "customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer with tags", body = CustomerWithTags),
        (status = 404, description = "Customer not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id, customer_id = %id))]
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let customer = state
        .db
        .customer_repository
        .get(ctx.business_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

    let tags = state
        .db
        .tag_repository
        .list_for_customer(ctx.business_id, id)
        .await?;

    Ok(Json(CustomerWithTags { customer, tags }))
}

#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    tag = "customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 404, description = "Customer not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(business_id = %ctx.business_id, customer_id = %id))]
pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateCustomerRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let customer = state
        .db
        .customer_repository
        .update(ctx.business_id, id, &request)
        .await?;

    Ok(Json(customer))
}

#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    tag = "customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 409, description = "Customer has bookings or quotes", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id, customer_id = %id))]
pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted = state
        .db
        .customer_repository
        .delete(ctx.business_id, id)
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Customer not found".to_string()).into());
    }

    Ok(StatusCode::NO_CONTENT)
}
