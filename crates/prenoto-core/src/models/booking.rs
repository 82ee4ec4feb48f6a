use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Booking status lifecycle.
///
/// Legal transitions, enforced server-side before any write:
/// `pending -> confirmed | cancelled`, `confirmed -> completed | cancelled |
/// no_show`. `completed`, `cancelled` and `no_show` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "booking_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::NoShow => write!(f, "no_show"),
        }
    }
}

impl BookingStatus {
    /// Whether a transition from `self` to `to` is allowed.
    pub fn can_transition_to(self, to: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, to),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
        )
    }

    /// Validate a requested transition, rejecting illegal ones.
    pub fn validate_transition(self, to: BookingStatus) -> Result<(), AppError> {
        if self.can_transition_to(to) {
            Ok(())
        } else {
            Err(AppError::InvalidStatusTransition {
                from: self.to_string(),
                to: to.to_string(),
            })
        }
    }

    /// Terminal statuses accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }

    /// Whether a booking in this status still occupies its time slot.
    /// Cancelled and no-show bookings release the window.
    pub fn occupies_slot(self) -> bool {
        !matches!(self, BookingStatus::Cancelled | BookingStatus::NoShow)
    }
}

/// A persisted appointment request.
///
/// No uniqueness constraint ties `(service, date, time)` together; overlap
/// rejection happens in the reservation writer's conflict check instead.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: Uuid,
    pub business_id: Uuid,
    pub customer_id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: BookingStatus,
    pub customer_notes: Option<String>,
    pub internal_notes: Option<String>,
    pub notification_sent: bool,
    pub reminder_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking joined with customer/service/staff display fields, for the
/// dashboard agenda.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BookingDetails {
    pub id: Uuid,
    pub booking_date: NaiveDate,
    #[schema(value_type = String, example = "10:00:00")]
    pub booking_time: NaiveTime,
    pub status: BookingStatus,
    pub customer_notes: Option<String>,
    pub internal_notes: Option<String>,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub service_id: Uuid,
    pub service_name: String,
    pub service_duration_minutes: i32,
    pub service_price: Decimal,
    pub staff_id: Option<Uuid>,
    pub staff_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public booking submission: the final step of the booking flow.
/// Required fields are re-validated here, not only in the UI widgets.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct SubmitBookingRequest {
    pub service_id: Uuid,
    #[serde(default)]
    pub staff_id: Option<Uuid>,
    pub booking_date: NaiveDate,
    #[schema(value_type = String, example = "10:00")]
    pub booking_time: NaiveTime,
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 3, max = 30, message = "Phone is required"))]
    pub phone: String,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Confirmation summary echoed back after a successful submission.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingConfirmation {
    pub booking_id: Uuid,
    pub business_name: String,
    pub service_name: String,
    pub booking_date: NaiveDate,
    #[schema(value_type = String, example = "10:00:00")]
    pub booking_time: NaiveTime,
    pub status: BookingStatus,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
}

/// Requested status change, from the dashboard.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookingNotesRequest {
    pub internal_notes: Option<String>,
}

/// Dashboard agenda date presets.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingPeriod {
    #[default]
    All,
    Today,
    Week,
    Month,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BookingListQuery {
    #[serde(default)]
    pub period: BookingPeriod,
    /// Case-insensitive match on customer name, or substring of phone.
    #[serde(default)]
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::NoShow));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Pending));
    }

    #[test]
    fn test_confirmed_transitions() {
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::NoShow));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Pending));
    }

    #[test]
    fn test_terminal_statuses_accept_nothing() {
        for terminal in [
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::NoShow,
        ] {
            assert!(terminal.is_terminal());
            for to in [
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                BookingStatus::Completed,
                BookingStatus::Cancelled,
                BookingStatus::NoShow,
            ] {
                assert!(!terminal.can_transition_to(to), "{terminal} -> {to}");
            }
        }
    }

    #[test]
    fn test_validate_transition_error_carries_both_states() {
        let err = BookingStatus::Completed
            .validate_transition(BookingStatus::Pending)
            .unwrap_err();
        match err {
            AppError::InvalidStatusTransition { from, to } => {
                assert_eq!(from, "completed");
                assert_eq!(to, "pending");
            }
            other => panic!("Expected InvalidStatusTransition, got {other:?}"),
        }
    }

    #[test]
    fn test_cancelled_and_no_show_release_slot() {
        assert!(BookingStatus::Pending.occupies_slot());
        assert!(BookingStatus::Confirmed.occupies_slot());
        assert!(BookingStatus::Completed.occupies_slot());
        assert!(!BookingStatus::Cancelled.occupies_slot());
        assert!(!BookingStatus::NoShow.occupies_slot());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::NoShow).unwrap(),
            "\"no_show\""
        );
        assert_eq!(
            serde_json::from_str::<BookingStatus>("\"pending\"").unwrap(),
            BookingStatus::Pending
        );
    }
}
