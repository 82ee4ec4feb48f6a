//! Route configuration and setup.

use crate::auth::middleware::{auth_middleware, AuthState};
use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use prenoto_core::Config;
use std::sync::Arc;
use utoipa::OpenApi;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

const MAX_BODY_BYTES: usize = 256 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let auth_state = Arc::new(AuthState {
        jwt_secret: config.jwt_secret.clone(),
        business_repository: state.db.business_repository.clone(),
    });

    let public = public_routes(state.clone());
    let protected = dashboard_routes(state.clone()).layer(axum::middleware::from_fn_with_state(
        auth_state,
        auth_middleware,
    ));

    let app = public
        .merge(protected)
        .route("/health", get(health_check).with_state(state))
        .merge(
            utoipa_rapidoc::RapiDoc::with_openapi(
                "/api/openapi.json",
                crate::api_doc::ApiDoc::openapi(),
            )
            .path("/docs"),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(app)
}

fn public_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            &format!("{API_PREFIX}/public/{{slug}}"),
            get(handlers::public_booking::get_booking_page),
        )
        .route(
            &format!("{API_PREFIX}/public/{{slug}}/slots"),
            get(handlers::public_booking::list_slots),
        )
        .route(
            &format!("{API_PREFIX}/public/{{slug}}/bookings"),
            post(handlers::public_booking::submit_booking),
        )
        .with_state(state)
}

fn dashboard_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Business lifecycle and settings
        .route(
            &format!("{API_PREFIX}/business"),
            post(handlers::settings::register_business)
                .get(handlers::settings::get_business)
                .put(handlers::settings::update_business),
        )
        .route(
            &format!("{API_PREFIX}/settings"),
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        // Agenda
        .route(
            &format!("{API_PREFIX}/bookings"),
            get(handlers::bookings::list_bookings),
        )
        .route(
            &format!("{API_PREFIX}/bookings/{{id}}"),
            get(handlers::bookings::get_booking),
        )
        .route(
            &format!("{API_PREFIX}/bookings/{{id}}/status"),
            put(handlers::bookings::update_booking_status),
        )
        .route(
            &format!("{API_PREFIX}/bookings/{{id}}/notes"),
            put(handlers::bookings::update_booking_notes),
        )
        // Catalog
        .route(
            &format!("{API_PREFIX}/services"),
            post(handlers::services::create_service).get(handlers::services::list_services),
        )
        .route(
            &format!("{API_PREFIX}/services/{{id}}"),
            put(handlers::services::update_service).delete(handlers::services::deactivate_service),
        )
        .route(
            &format!("{API_PREFIX}/staff"),
            post(handlers::staff::create_staff).get(handlers::staff::list_staff),
        )
        .route(
            &format!("{API_PREFIX}/staff/{{id}}"),
            put(handlers::staff::update_staff).delete(handlers::staff::deactivate_staff),
        )
        // CRM
        .route(
            &format!("{API_PREFIX}/customers"),
            post(handlers::customers::create_customer).get(handlers::customers::list_customers),
        )
        .route(
            &format!("{API_PREFIX}/customers/{{id}}"),
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route(
            &format!("{API_PREFIX}/tags"),
            post(handlers::tags::create_tag).get(handlers::tags::list_tags),
        )
        .route(
            &format!("{API_PREFIX}/tags/{{id}}"),
            delete(handlers::tags::delete_tag),
        )
        .route(
            &format!("{API_PREFIX}/customers/{{customer_id}}/tags/{{tag_id}}"),
            put(handlers::tags::assign_tag).delete(handlers::tags::unassign_tag),
        )
        // Quotes
        .route(
            &format!("{API_PREFIX}/quotes"),
            post(handlers::quotes::create_quote).get(handlers::quotes::list_quotes),
        )
        .route(
            &format!("{API_PREFIX}/quotes/{{id}}"),
            get(handlers::quotes::get_quote).delete(handlers::quotes::delete_quote),
        )
        .route(
            &format!("{API_PREFIX}/quotes/{{id}}/status"),
            put(handlers::quotes::update_quote_status),
        )
        // Marketing & statistics
        .route(
            &format!("{API_PREFIX}/campaigns/templates"),
            get(handlers::campaigns::list_templates),
        )
        .route(
            &format!("{API_PREFIX}/campaigns/render"),
            post(handlers::campaigns::render_campaign),
        )
        .route(
            &format!("{API_PREFIX}/statistics"),
            get(handlers::statistics::get_statistics),
        )
        .with_state(state)
}

/// Liveness plus a database ping.
async fn health_check(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> impl IntoResponse {
    let db_ok = sqlx::query("SELECT 1")
        .execute(&state.db.pool)
        .await
        .is_ok();
    let status = if db_ok { "ok" } else { "degraded" };

    Json(serde_json::json!({
        "status": status,
        "database": db_ok,
    }))
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([axum::http::header::AUTHORIZATION, axum::http::header::CONTENT_TYPE])
    };

    Ok(cors)
}
