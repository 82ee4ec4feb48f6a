//! OpenAPI documentation, served at /docs (RapiDoc) and /api/openapi.json.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use prenoto_core::campaign;
use prenoto_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Prenoto API",
        version = "0.1.0",
        description = "Multi-tenant scheduling and CRM API for local service businesses. \
            Public booking endpoints are unauthenticated and addressed by business slug; \
            dashboard endpoints require a bearer token resolvable to one business."
    ),
    paths(
        // Public booking flow
        handlers::public_booking::get_booking_page,
        handlers::public_booking::list_slots,
        handlers::public_booking::submit_booking,
        // Bookings (dashboard)
        handlers::bookings::list_bookings,
        handlers::bookings::get_booking,
        handlers::bookings::update_booking_status,
        handlers::bookings::update_booking_notes,
        // Catalog
        handlers::services::create_service,
        handlers::services::list_services,
        handlers::services::update_service,
        handlers::services::deactivate_service,
        handlers::staff::create_staff,
        handlers::staff::list_staff,
        handlers::staff::update_staff,
        handlers::staff::deactivate_staff,
        // CRM
        handlers::customers::create_customer,
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::tags::create_tag,
        handlers::tags::list_tags,
        handlers::tags::delete_tag,
        handlers::tags::assign_tag,
        handlers::tags::unassign_tag,
        // Quotes
        handlers::quotes::create_quote,
        handlers::quotes::list_quotes,
        handlers::quotes::get_quote,
        handlers::quotes::update_quote_status,
        handlers::quotes::delete_quote,
        // Marketing & statistics
        handlers::campaigns::list_templates,
        handlers::campaigns::render_campaign,
        handlers::statistics::get_statistics,
        // Business
        handlers::settings::register_business,
        handlers::settings::get_business,
        handlers::settings::update_business,
        handlers::settings::get_settings,
        handlers::settings::update_settings,
    ),
    components(schemas(
        error::ErrorResponse,
        models::Business,
        models::BusinessSettings,
        models::PublicBusinessProfile,
        models::RegisterBusinessRequest,
        models::UpdateBusinessRequest,
        models::UpdateSettingsRequest,
        models::Service,
        models::PublicService,
        models::CreateServiceRequest,
        models::UpdateServiceRequest,
        models::StaffMember,
        models::CreateStaffRequest,
        models::UpdateStaffRequest,
        models::Customer,
        models::CustomerWithTags,
        models::CreateCustomerRequest,
        models::UpdateCustomerRequest,
        models::CustomerTag,
        models::CreateTagRequest,
        models::TagColor,
        models::Booking,
        models::BookingDetails,
        models::BookingStatus,
        models::BookingConfirmation,
        models::SubmitBookingRequest,
        models::UpdateBookingStatusRequest,
        models::UpdateBookingNotesRequest,
        models::Quote,
        models::QuoteItem,
        models::QuoteStatus,
        models::QuoteWithItems,
        models::CreateQuoteRequest,
        models::QuoteItemInput,
        models::UpdateQuoteStatusRequest,
        campaign::CampaignTemplate,
        campaign::RenderCampaignRequest,
        campaign::CampaignRecipient,
        handlers::public_booking::PublicBookingPage,
        handlers::public_booking::SlotsResponse,
        handlers::statistics::StatsSummary,
    )),
    tags(
        (name = "public", description = "Unauthenticated booking flow"),
        (name = "bookings", description = "Dashboard agenda and status lifecycle"),
        (name = "services", description = "Service catalog"),
        (name = "staff", description = "Staff management"),
        (name = "customers", description = "Customer records"),
        (name = "tags", description = "Customer tagging"),
        (name = "quotes", description = "Itemized quotes"),
        (name = "campaigns", description = "WhatsApp-style campaign composer"),
        (name = "statistics", description = "Summary statistics"),
        (name = "business", description = "Registration, profile, settings")
    )
)]
pub struct ApiDoc;
