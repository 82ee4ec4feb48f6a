use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A bookable service offered by a business (e.g. "Taglio uomo", 30 min).
///
/// Services are soft-deleted by clearing `is_active`; bookings keep their
/// foreign key to the row either way.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Service {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 480, message = "Duration must be between 1 and 480 minutes"))]
    pub duration_minutes: i32,
    pub price: Decimal,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateServiceRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, max = 480))]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Service as shown on the public booking page.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicService {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: Decimal,
}

impl From<Service> for PublicService {
    fn from(service: Service) -> Self {
        PublicService {
            id: service.id,
            name: service.name,
            description: service.description,
            duration_minutes: service.duration_minutes,
            price: service.price,
        }
    }
}
