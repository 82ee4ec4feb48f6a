//! Public, unauthenticated booking surface, addressed by business slug.

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use prenoto_core::models::{
    Business, BookingConfirmation, PublicBusinessProfile, PublicService, SubmitBookingRequest,
};
use prenoto_core::{scheduling, AppError};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Booking page payload: profile plus active services, cheapest first.
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct PublicBookingPage {
    pub business: PublicBusinessProfile,
    pub services: Vec<PublicService>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SlotsQuery {
    pub service_id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub staff_id: Option<Uuid>,
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct SlotsResponse {
    pub date: NaiveDate,
    /// Start times in "HH:MM" order, already-booked windows excluded.
    pub slots: Vec<String>,
}

async fn resolve_business(state: &AppState, slug: &str) -> Result<Business, AppError> {
    state
        .db
        .business_repository
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| AppError::BusinessNotFound(slug.to_string()))
}

#[utoipa::path(
    get,
    path = "/api/v1/public/{slug}",
    tag = "public",
    params(("slug" = String, Path, description = "Business booking slug")),
    responses(
        (status = 200, description = "Booking page data", body = PublicBookingPage),
        (status = 404, description = "Unknown or inactive business", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(slug = %slug))]
pub async fn get_booking_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let business = resolve_business(&state, &slug).await?;

    let services = state
        .db
        .service_repository
        .list(business.id, true)
        .await?
        .into_iter()
        .map(PublicService::from)
        .collect();

    Ok(Json(PublicBookingPage {
        business: PublicBusinessProfile::from(&business),
        services,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/public/{slug}/slots",
    tag = "public",
    params(
        ("slug" = String, Path, description = "Business booking slug"),
        SlotsQuery
    ),
    responses(
        (status = 200, description = "Available start times", body = SlotsResponse),
        (status = 400, description = "Date outside the booking window", body = ErrorResponse),
        (status = 404, description = "Unknown business or service", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(slug = %slug, service_id = %query.service_id, date = %query.date))]
pub async fn list_slots(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let business = resolve_business(&state, &slug).await?;

    let slots = state
        .booking_workflow
        .available_slots(&business, query.service_id, query.date, query.staff_id)
        .await?;

    Ok(Json(SlotsResponse {
        date: query.date,
        slots: slots.into_iter().map(scheduling::format_slot).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/public/{slug}/bookings",
    tag = "public",
    params(("slug" = String, Path, description = "Business booking slug")),
    request_body = SubmitBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingConfirmation),
        (status = 400, description = "Invalid submission", body = ErrorResponse),
        (status = 404, description = "Unknown business or service", body = ErrorResponse),
        (status = 409, description = "Slot no longer available", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(slug = %slug))]
pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    ValidatedJson(request): ValidatedJson<SubmitBookingRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let business = resolve_business(&state, &slug).await?;

    let confirmation = state.booking_workflow.submit(&business, &request).await?;

    Ok((StatusCode::CREATED, Json(confirmation)))
}
