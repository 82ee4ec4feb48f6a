use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Business (tenant) entity. The unit of data isolation: every owned row
/// carries a `business_id` and every query is scoped by it.
///
/// The slug is globally unique and stable once published — it is embedded in
/// shared booking links, so it is never regenerated on rename.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Business {
    pub id: Uuid,
    /// Subject of the external identity provider that owns this tenant.
    pub owner_user_id: Uuid,
    pub name: String,
    pub slug: String,
    pub business_type: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-business behavior settings, 1:1 with `Business`.
///
/// `auto_confirm_bookings` is read by the reservation writer: when enabled,
/// public bookings start as `confirmed` instead of `pending`.
/// `send_email_notifications` is stored for the external notification
/// subsystem and never read here.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BusinessSettings {
    pub business_id: Uuid,
    pub booking_buffer_minutes: i32,
    pub advance_booking_days: i32,
    pub cancellation_hours: i32,
    pub auto_confirm_bookings: bool,
    pub send_email_notifications: bool,
    pub opening_hour: i32,
    pub closing_hour: i32,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for registering a new business (tenant signup).
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterBusinessRequest {
    #[validate(length(min = 2, max = 120))]
    pub name: String,
    #[validate(length(min = 2, max = 40))]
    pub business_type: String,
    pub phone: Option<String>,
    pub city: Option<String>,
}

/// Request DTO for updating the business profile. Absent fields are left
/// unchanged; the slug is not updatable.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateBusinessRequest {
    #[serde(default)]
    #[validate(length(min = 2, max = 120))]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
}

/// Request DTO for updating business settings.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    #[validate(range(min = 0, max = 240))]
    pub booking_buffer_minutes: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 1, max = 365))]
    pub advance_booking_days: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0, max = 168))]
    pub cancellation_hours: Option<i32>,
    #[serde(default)]
    pub auto_confirm_bookings: Option<bool>,
    #[serde(default)]
    pub send_email_notifications: Option<bool>,
    #[serde(default)]
    #[validate(range(min = 0, max = 23))]
    pub opening_hour: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 1, max = 24))]
    pub closing_hour: Option<i32>,
}

/// Public profile returned by the unauthenticated booking page endpoint.
/// Deliberately omits owner identity and internal flags.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicBusinessProfile {
    pub name: String,
    pub slug: String,
    pub business_type: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl From<&Business> for PublicBusinessProfile {
    fn from(business: &Business) -> Self {
        PublicBusinessProfile {
            name: business.name.clone(),
            slug: business.slug.clone(),
            business_type: business.business_type.clone(),
            description: business.description.clone(),
            city: business.city.clone(),
            address: business.address.clone(),
            phone: business.phone.clone(),
        }
    }
}
