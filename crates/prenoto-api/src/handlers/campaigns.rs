//! Campaign composer endpoints.

use crate::auth::BusinessContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use prenoto_core::campaign::{CampaignRecipient, CampaignTemplate, RenderCampaignRequest};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/campaigns/templates",
    tag = "campaigns",
    responses((status = 200, description = "Built-in message templates", body = [CampaignTemplate]))
)]
#[tracing::instrument(skip(state, ctx), fields(business_id = %ctx.business_id))]
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(state.campaigns.templates()))
}

#[utoipa::path(
    post,
    path = "/api/v1/campaigns/render",
    tag = "campaigns",
    request_body = RenderCampaignRequest,
    responses(
        (status = 200, description = "Personalized message and wa.me link per recipient", body = [CampaignRecipient]),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(business_id = %ctx.business_id))]
pub async fn render_campaign(
    State(state): State<Arc<AppState>>,
    ctx: BusinessContext,
    ValidatedJson(request): ValidatedJson<RenderCampaignRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let recipients = state
        .campaigns
        .recipients(&ctx.business, &request.message, request.tag_id)
        .await?;

    Ok(Json(recipients))
}
