use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Customer record, scoped to one business.
///
/// `(business_id, phone)` is the identity key. The phone string is stored
/// exactly as entered — no punctuation or country-code normalization — so
/// "333-1234567" and "3331234567" are distinct customers. Intentional;
/// backed by a unique index.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 3, max = 30))]
    pub phone: String,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateCustomerRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Tag color palette offered by the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "tag_color", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Blue,
    Green,
    Yellow,
    Red,
    Orange,
    Purple,
    Gray,
}

/// Named, colored customer tag (per business), e.g. "VIP" or "Nuovo".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CustomerTag {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub emoji: Option<String>,
    pub color: TagColor,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 40))]
    pub name: String,
    #[serde(default)]
    pub emoji: Option<String>,
    pub color: TagColor,
}

/// Customer plus their assigned tags, for dashboard listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerWithTags {
    #[serde(flatten)]
    pub customer: Customer,
    pub tags: Vec<CustomerTag>,
}
