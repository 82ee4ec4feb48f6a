//! Dashboard statistics summary.

use crate::auth::BusinessContext;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use prenoto_core::models::BookingStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct StatsQuery {
    /// Window length in days, counted back from today.
    #[serde(default = "default_period_days")]
    pub period_days: i64,
}

fn default_period_days() -> i64 {
    30
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsSummary {
    pub period_days: i64,
    pub bookings_total: i64,
    pub bookings_pending: i64,
    pub bookings_confirmed: i64,
    pub bookings_completed: i64,
    pub bookings_cancelled: i64,
    pub bookings_no_show: i64,
    pub customers_total: i64,
    /// Sum of accepted-quote totals issued in the window.
    pub accepted_quote_revenue: Decimal,
}

#[utoipa::path(
    get,
    path = "/api/v1/statistics",
    tag = "statistics",
    params(StatsQuery),
    responses((status = 200, description = "Summary for the window", body = StatsSummary))
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id))]
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let period_days = query.period_days.clamp(1, 365);
    let today = Utc::now().date_naive();
    let from = today - chrono::Duration::days(period_days);

    let counts = state
        .db
        .booking_repository
        .counts_by_status(ctx.business_id, from, today)
        .await?;

    let mut summary = StatsSummary {
        period_days,
        bookings_total: 0,
        bookings_pending: 0,
        bookings_confirmed: 0,
        bookings_completed: 0,
        bookings_cancelled: 0,
        bookings_no_show: 0,
        customers_total: state.db.customer_repository.count(ctx.business_id).await?,
        accepted_quote_revenue: state
            .db
            .quote_repository
            .accepted_revenue(ctx.business_id, from, today)
            .await?,
    };

    for (status, count) in counts {
        summary.bookings_total += count;
        match status {
            BookingStatus::Pending => summary.bookings_pending = count,
            BookingStatus::Confirmed => summary.bookings_confirmed = count,
            BookingStatus::Completed => summary.bookings_completed = count,
            BookingStatus::Cancelled => summary.bookings_cancelled = count,
            BookingStatus::NoShow => summary.bookings_no_show = count,
        }
    }

    Ok(Json(summary))
}
