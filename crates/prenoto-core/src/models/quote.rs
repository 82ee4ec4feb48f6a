use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Quote status lifecycle: `draft -> sent -> accepted | rejected`; any
/// non-terminal quote can be marked `expired`. Terminal: accepted, rejected,
/// expired.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "quote_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

impl Display for QuoteStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            QuoteStatus::Draft => write!(f, "draft"),
            QuoteStatus::Sent => write!(f, "sent"),
            QuoteStatus::Accepted => write!(f, "accepted"),
            QuoteStatus::Rejected => write!(f, "rejected"),
            QuoteStatus::Expired => write!(f, "expired"),
        }
    }
}

impl QuoteStatus {
    pub fn can_transition_to(self, to: QuoteStatus) -> bool {
        use QuoteStatus::*;
        matches!(
            (self, to),
            (Draft, Sent) | (Sent, Accepted) | (Sent, Rejected) | (Draft, Expired) | (Sent, Expired)
        )
    }

    pub fn validate_transition(self, to: QuoteStatus) -> Result<(), AppError> {
        if self.can_transition_to(to) {
            Ok(())
        } else {
            Err(AppError::InvalidStatusTransition {
                from: self.to_string(),
                to: to.to_string(),
            })
        }
    }
}

/// An itemized, priced proposal sent to a customer.
///
/// Totals are computed once at creation from the line items and stored;
/// they are not re-derived afterward.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Quote {
    pub id: Uuid,
    pub business_id: Uuid,
    pub customer_id: Uuid,
    pub quote_number: String,
    pub status: QuoteStatus,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub notes: Option<String>,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ordered quote line item. `total` is quantity x unit price, fixed at
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct QuoteItem {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct QuoteItemInput {
    #[validate(length(min = 1, max = 200))]
    pub description: String,
    #[validate(range(min = 1, max = 999))]
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl QuoteItemInput {
    /// Line total at creation time.
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateQuoteRequest {
    pub customer_id: Uuid,
    /// Days until expiry, counted from the issue date.
    #[serde(default = "default_expiry_days")]
    #[validate(range(min = 1, max = 365))]
    pub expiry_days: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "A quote needs at least one line item"))]
    #[validate(nested)]
    pub items: Vec<QuoteItemInput>,
}

fn default_expiry_days() -> i64 {
    30
}

impl CreateQuoteRequest {
    /// Sum of line totals. Tax is not applied at creation (rate 0).
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(QuoteItemInput::line_total).sum()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuoteStatusRequest {
    pub status: QuoteStatus,
}

/// Quote plus its ordered items, for dashboard detail views.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteWithItems {
    #[serde(flatten)]
    pub quote: Quote,
    pub items: Vec<QuoteItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eur(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn test_line_total() {
        let item = QuoteItemInput {
            description: "Piega".to_string(),
            quantity: 3,
            unit_price: eur(18_50),
        };
        assert_eq!(item.line_total(), eur(55_50));
    }

    #[test]
    fn test_subtotal_sums_line_totals() {
        let request = CreateQuoteRequest {
            customer_id: Uuid::new_v4(),
            expiry_days: 30,
            notes: None,
            items: vec![
                QuoteItemInput {
                    description: "Taglio".to_string(),
                    quantity: 1,
                    unit_price: eur(25_00),
                },
                QuoteItemInput {
                    description: "Colore".to_string(),
                    quantity: 2,
                    unit_price: eur(40_00),
                },
            ],
        };
        assert_eq!(request.subtotal(), eur(105_00));
    }

    #[test]
    fn test_quote_status_transitions() {
        assert!(QuoteStatus::Draft.can_transition_to(QuoteStatus::Sent));
        assert!(QuoteStatus::Sent.can_transition_to(QuoteStatus::Accepted));
        assert!(QuoteStatus::Sent.can_transition_to(QuoteStatus::Rejected));
        assert!(QuoteStatus::Draft.can_transition_to(QuoteStatus::Expired));
        assert!(!QuoteStatus::Draft.can_transition_to(QuoteStatus::Accepted));
        assert!(!QuoteStatus::Accepted.can_transition_to(QuoteStatus::Sent));
        assert!(!QuoteStatus::Expired.can_transition_to(QuoteStatus::Sent));
    }

    #[test]
    fn test_validate_transition_rejects_illegal() {
        let err = QuoteStatus::Accepted
            .validate_transition(QuoteStatus::Rejected)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidStatusTransition { .. }));
    }
}
