//! Dashboard agenda: listing, detail, status lifecycle, internal notes.

use crate::auth::BusinessContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{Months, Utc};
use prenoto_core::models::{
    Booking, BookingDetails, BookingListQuery, BookingPeriod, UpdateBookingNotesRequest,
    UpdateBookingStatusRequest,
};
use prenoto_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "bookings",
    responses(
        (status = 200, description = "Bookings for the period", body = [BookingDetails]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id))]
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Query(query): Query<BookingListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let today = Utc::now().date_naive();
    let (from, to) = match query.period {
        BookingPeriod::All => (None, None),
        BookingPeriod::Today => (Some(today), Some(today)),
        BookingPeriod::Week => (Some(today), Some(today + chrono::Duration::days(7))),
        BookingPeriod::Month => (Some(today), today.checked_add_months(Months::new(1))),
    };

    let bookings = state
        .db
        .booking_repository
        .list_details(ctx.business_id, from, to, query.search.as_deref())
        .await?;

    Ok(Json(bookings))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking detail", body = BookingDetails),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id, booking_id = %id))]
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let booking = state
        .db
        .booking_repository
        .get_details(ctx.business_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    Ok(Json(booking))
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/status",
    tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdateBookingStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Booking),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Transition not allowed", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, ctx, request),
    fields(business_id = %ctx.business_id, booking_id = %id, requested_status = %request.status)
)]
pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let booking: Booking = state
        .booking_workflow
        .change_status(ctx.business_id, id, request.status)
        .await?;

    Ok(Json(booking))
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/notes",
    tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdateBookingNotesRequest,
    responses(
        (status = 200, description = "Notes updated", body = Booking),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(business_id = %ctx.business_id, booking_id = %id))]
pub async fn update_booking_notes(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingNotesRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let booking = state
        .db
        .booking_repository
        .update_internal_notes(ctx.business_id, id, request.internal_notes.as_deref())
        .await?;

    Ok(Json(booking))
}
