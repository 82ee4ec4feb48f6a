//! Public booking flow state machine.
//!
//! The multi-step flow (pick a service, pick a date and time, enter contact
//! details, confirm) is a tagged union rather than a bag of independent
//! selections, so states like "a chosen time with no chosen service" cannot
//! be represented. The workflow service walks these transitions when
//! validating a submission; transitions are pure and take whatever context
//! they need as arguments.

use chrono::{NaiveDate, NaiveTime};

use crate::error::AppError;
use crate::models::booking::BookingConfirmation;
use crate::models::service::Service;

/// The service fields the flow carries between steps.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSelection {
    pub id: uuid::Uuid,
    pub name: String,
    pub duration_minutes: i32,
}

impl From<&Service> for ServiceSelection {
    fn from(service: &Service) -> Self {
        ServiceSelection {
            id: service.id,
            name: service.name.clone(),
            duration_minutes: service.duration_minutes,
        }
    }
}

#[derive(Debug, Clone)]
pub enum BookingFlow {
    /// Initial state: no selection yet.
    SelectService,
    /// A service is chosen; date and time are picked within this state and
    /// both are required to proceed.
    SelectDateTime {
        service: ServiceSelection,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    },
    /// Date and time are locked in; awaiting contact details.
    EnterCustomerDetails {
        service: ServiceSelection,
        date: NaiveDate,
        time: NaiveTime,
    },
    /// Terminal: the booking row exists; holds the summary to display.
    Confirmed(BookingConfirmation),
}

impl Default for BookingFlow {
    fn default() -> Self {
        BookingFlow::SelectService
    }
}

impl BookingFlow {
    pub fn new() -> Self {
        BookingFlow::SelectService
    }

    /// Choose a service. Only inactive services are rejected; the caller
    /// resolves the row.
    pub fn select_service(self, service: &Service) -> Result<Self, AppError> {
        match self {
            BookingFlow::SelectService => {
                if !service.is_active {
                    return Err(AppError::NotFound("Service not found".to_string()));
                }
                Ok(BookingFlow::SelectDateTime {
                    service: ServiceSelection::from(service),
                    date: None,
                    time: None,
                })
            }
            other => Err(other.wrong_step("select a service")),
        }
    }

    /// Pick a calendar date. Bounded to `[today, today + advance_days]`.
    /// Changing the date discards a previously picked time.
    pub fn pick_date(
        self,
        date: NaiveDate,
        today: NaiveDate,
        advance_days: i64,
    ) -> Result<Self, AppError> {
        match self {
            BookingFlow::SelectDateTime {
                service,
                date: previous,
                time,
            } => {
                if date < today {
                    return Err(AppError::BadRequest(
                        "Booking date cannot be in the past".to_string(),
                    ));
                }
                if date > today + chrono::Duration::days(advance_days) {
                    return Err(AppError::BadRequest(format!(
                        "Bookings open at most {} days in advance",
                        advance_days
                    )));
                }
                let time = if previous == Some(date) { time } else { None };
                Ok(BookingFlow::SelectDateTime {
                    service,
                    date: Some(date),
                    time,
                })
            }
            other => Err(other.wrong_step("pick a date")),
        }
    }

    /// Pick a start time from the offered slots.
    pub fn pick_time(self, time: NaiveTime, available: &[NaiveTime]) -> Result<Self, AppError> {
        match self {
            BookingFlow::SelectDateTime {
                service,
                date: Some(date),
                ..
            } => {
                if !available.contains(&time) {
                    return Err(AppError::SlotUnavailable {
                        date: date.to_string(),
                        time: crate::scheduling::format_slot(time),
                    });
                }
                Ok(BookingFlow::SelectDateTime {
                    service,
                    date: Some(date),
                    time: Some(time),
                })
            }
            BookingFlow::SelectDateTime { date: None, .. } => Err(AppError::BadRequest(
                "Pick a date before picking a time".to_string(),
            )),
            other => Err(other.wrong_step("pick a time")),
        }
    }

    /// Advance to contact details once both date and time are chosen.
    pub fn proceed_to_details(self) -> Result<Self, AppError> {
        match self {
            BookingFlow::SelectDateTime {
                service,
                date: Some(date),
                time: Some(time),
            } => Ok(BookingFlow::EnterCustomerDetails {
                service,
                date,
                time,
            }),
            BookingFlow::SelectDateTime { .. } => Err(AppError::BadRequest(
                "Both a date and a time are required".to_string(),
            )),
            other => Err(other.wrong_step("continue")),
        }
    }

    /// Go back one step, discarding downstream selections.
    pub fn back(self) -> Self {
        match self {
            BookingFlow::SelectDateTime { .. } => BookingFlow::SelectService,
            BookingFlow::EnterCustomerDetails {
                service,
                date,
                time,
            } => BookingFlow::SelectDateTime {
                service,
                date: Some(date),
                time: Some(time),
            },
            other => other,
        }
    }

    /// Terminal transition after the booking row has been written.
    pub fn confirm(self, summary: BookingConfirmation) -> Result<Self, AppError> {
        match self {
            BookingFlow::EnterCustomerDetails { .. } => Ok(BookingFlow::Confirmed(summary)),
            other => Err(other.wrong_step("confirm")),
        }
    }

    /// Starting a new booking resets the flow.
    pub fn restart(self) -> Self {
        BookingFlow::SelectService
    }

    fn step_name(&self) -> &'static str {
        match self {
            BookingFlow::SelectService => "service selection",
            BookingFlow::SelectDateTime { .. } => "date and time selection",
            BookingFlow::EnterCustomerDetails { .. } => "contact details",
            BookingFlow::Confirmed(_) => "confirmation",
        }
    }

    fn wrong_step(self, action: &str) -> AppError {
        AppError::BadRequest(format!(
            "Cannot {} during {}",
            action,
            self.step_name()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::BookingStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn service(active: bool) -> Service {
        let now = Utc::now();
        Service {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            name: "Taglio uomo".to_string(),
            description: None,
            duration_minutes: 30,
            price: Decimal::new(20_00, 2),
            is_active: active,
            created_at: now,
            updated_at: now,
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_happy_path() {
        let svc = service(true);
        let today = date("2026-06-01");
        let slots = vec![hm(10, 0), hm(10, 30)];

        let flow = BookingFlow::new()
            .select_service(&svc)
            .unwrap()
            .pick_date(date("2026-06-10"), today, 30)
            .unwrap()
            .pick_time(hm(10, 0), &slots)
            .unwrap()
            .proceed_to_details()
            .unwrap();

        match &flow {
            BookingFlow::EnterCustomerDetails {
                service,
                date: d,
                time,
            } => {
                assert_eq!(service.id, svc.id);
                assert_eq!(*d, date("2026-06-10"));
                assert_eq!(*time, hm(10, 0));
            }
            other => panic!("Expected EnterCustomerDetails, got {other:?}"),
        }

        let summary = BookingConfirmation {
            booking_id: Uuid::new_v4(),
            business_name: "Salone da Anna".to_string(),
            service_name: svc.name.clone(),
            booking_date: date("2026-06-10"),
            booking_time: hm(10, 0),
            status: BookingStatus::Pending,
            customer_name: "Mario Rossi".to_string(),
            customer_phone: "3331234567".to_string(),
            customer_email: None,
        };
        let confirmed = flow.confirm(summary).unwrap();
        assert!(matches!(confirmed, BookingFlow::Confirmed(_)));

        // A new booking starts over from scratch.
        assert!(matches!(confirmed.restart(), BookingFlow::SelectService));
    }

    #[test]
    fn test_inactive_service_rejected() {
        let svc = service(false);
        assert!(BookingFlow::new().select_service(&svc).is_err());
    }

    #[test]
    fn test_time_requires_date() {
        let svc = service(true);
        let flow = BookingFlow::new().select_service(&svc).unwrap();
        let err = flow.pick_time(hm(10, 0), &[hm(10, 0)]).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_time_outside_offered_slots_rejected() {
        let svc = service(true);
        let today = date("2026-06-01");
        let flow = BookingFlow::new()
            .select_service(&svc)
            .unwrap()
            .pick_date(date("2026-06-10"), today, 30)
            .unwrap();
        let err = flow.pick_time(hm(7, 0), &[hm(10, 0)]).unwrap_err();
        assert!(matches!(err, AppError::SlotUnavailable { .. }));
    }

    #[test]
    fn test_date_window_bounds() {
        let today = date("2026-06-01");
        let start = || BookingFlow::new().select_service(&service(true)).unwrap();

        assert!(start().pick_date(date("2026-05-31"), today, 30).is_err());
        assert!(start().pick_date(date("2026-07-02"), today, 30).is_err());
        assert!(start().pick_date(date("2026-07-01"), today, 30).is_ok());
        assert!(start().pick_date(today, today, 30).is_ok());
    }

    #[test]
    fn test_changing_date_discards_time() {
        let svc = service(true);
        let today = date("2026-06-01");
        let slots = vec![hm(10, 0)];
        let flow = BookingFlow::new()
            .select_service(&svc)
            .unwrap()
            .pick_date(date("2026-06-10"), today, 30)
            .unwrap()
            .pick_time(hm(10, 0), &slots)
            .unwrap()
            .pick_date(date("2026-06-11"), today, 30)
            .unwrap();
        assert!(matches!(
            flow,
            BookingFlow::SelectDateTime { time: None, .. }
        ));
    }

    #[test]
    fn test_repicking_same_date_keeps_time() {
        let svc = service(true);
        let today = date("2026-06-01");
        let flow = BookingFlow::new()
            .select_service(&svc)
            .unwrap()
            .pick_date(date("2026-06-10"), today, 30)
            .unwrap()
            .pick_time(hm(10, 0), &[hm(10, 0)])
            .unwrap()
            .pick_date(date("2026-06-10"), today, 30)
            .unwrap();
        assert!(matches!(
            flow,
            BookingFlow::SelectDateTime {
                time: Some(t), ..
            } if t == hm(10, 0)
        ));
    }

    #[test]
    fn test_back_navigation() {
        let svc = service(true);
        let today = date("2026-06-01");
        let flow = BookingFlow::new()
            .select_service(&svc)
            .unwrap()
            .pick_date(date("2026-06-10"), today, 30)
            .unwrap()
            .pick_time(hm(10, 0), &[hm(10, 0)])
            .unwrap()
            .proceed_to_details()
            .unwrap();

        // Details -> date/time keeps the picks; one more back drops them.
        let flow = flow.back();
        assert!(matches!(
            flow,
            BookingFlow::SelectDateTime {
                date: Some(_),
                time: Some(_),
                ..
            }
        ));
        assert!(matches!(flow.back(), BookingFlow::SelectService));
    }

    #[test]
    fn test_proceed_requires_both_picks() {
        let svc = service(true);
        let today = date("2026-06-01");
        let flow = BookingFlow::new()
            .select_service(&svc)
            .unwrap()
            .pick_date(date("2026-06-10"), today, 30)
            .unwrap();
        assert!(flow.proceed_to_details().is_err());
    }

    #[test]
    fn test_out_of_order_actions_rejected() {
        assert!(BookingFlow::new().proceed_to_details().is_err());
        assert!(BookingFlow::new()
            .pick_date(date("2026-06-10"), date("2026-06-01"), 30)
            .is_err());
    }
}
