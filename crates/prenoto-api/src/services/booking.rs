//! The booking workflow: slot listing, public submission, and the status
//! lifecycle.
//!
//! Submission walks the [`BookingFlow`] state machine step by step — service,
//! date, time, details — so the same gates apply whether selections arrive
//! one request at a time or in a single POST. The two writes then run in
//! order: customer find-or-create, conflict-checked booking insert. A
//! customer row created for a submission that subsequently fails its insert
//! is deliberately kept.

use chrono::{NaiveDate, NaiveTime, Utc};
use prenoto_core::models::{
    Booking, BookingConfirmation, BookingStatus, Business, Service, SubmitBookingRequest,
};
use prenoto_core::{scheduling, validation, AppError, BookingFlow};
use prenoto_db::{
    BookingRepository, CustomerRepository, NewBooking, ServiceRepository, SettingsRepository,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct BookingWorkflow {
    settings: SettingsRepository,
    services: ServiceRepository,
    customers: CustomerRepository,
    bookings: BookingRepository,
}

impl BookingWorkflow {
    pub fn new(
        settings: SettingsRepository,
        services: ServiceRepository,
        customers: CustomerRepository,
        bookings: BookingRepository,
    ) -> Self {
        Self {
            settings,
            services,
            customers,
            bookings,
        }
    }

    /// Bookable start times for a service on a date: business hours at the
    /// service's duration, minus windows already held by other bookings.
    #[tracing::instrument(skip(self, business), fields(business_id = %business.id))]
    pub async fn available_slots(
        &self,
        business: &Business,
        service_id: Uuid,
        date: NaiveDate,
        staff_id: Option<Uuid>,
    ) -> Result<Vec<NaiveTime>, AppError> {
        let settings = self.settings.get(business.id).await?;
        let service = self.active_service(business, service_id).await?;

        // Same window gate the submission path applies.
        BookingFlow::new()
            .select_service(&service)?
            .pick_date(
                date,
                Utc::now().date_naive(),
                settings.advance_booking_days as i64,
            )?;

        let candidates = scheduling::generate_time_slots(
            settings.opening_hour,
            settings.closing_hour,
            service.duration_minutes,
        )?;
        let booked = self
            .bookings
            .booked_windows(business.id, date, staff_id)
            .await?;

        Ok(scheduling::filter_available(
            candidates,
            service.duration_minutes,
            &booked,
        ))
    }

    /// Commit one booking: validate the full flow, resolve the customer,
    /// write the reservation.
    #[tracing::instrument(
        skip(self, business, request),
        fields(business_id = %business.id, service_id = %request.service_id)
    )]
    pub async fn submit(
        &self,
        business: &Business,
        request: &SubmitBookingRequest,
    ) -> Result<BookingConfirmation, AppError> {
        if !validation::is_valid_phone(&request.phone) {
            return Err(AppError::InvalidInput(format!(
                "'{}' does not look like a phone number",
                request.phone
            )));
        }
        if let Some(email) = request.email.as_deref() {
            if !validation::is_valid_email(email) {
                return Err(AppError::InvalidInput(format!(
                    "'{}' does not look like an email address",
                    email
                )));
            }
        }

        let settings = self.settings.get(business.id).await?;
        let service = self.active_service(business, request.service_id).await?;

        let candidates = scheduling::generate_time_slots(
            settings.opening_hour,
            settings.closing_hour,
            service.duration_minutes,
        )?;
        let booked = self
            .bookings
            .booked_windows(business.id, request.booking_date, request.staff_id)
            .await?;
        let available =
            scheduling::filter_available(candidates, service.duration_minutes, &booked);

        let flow = BookingFlow::new()
            .select_service(&service)?
            .pick_date(
                request.booking_date,
                Utc::now().date_naive(),
                settings.advance_booking_days as i64,
            )?
            .pick_time(request.booking_time, &available)?
            .proceed_to_details()?;

        // Find-or-create is atomic on (business, phone); the row survives
        // even if the insert below fails.
        let customer_id = self
            .customers
            .resolve_by_phone(
                business.id,
                &request.phone,
                &request.name,
                request.email.as_deref(),
            )
            .await?;

        let status = if settings.auto_confirm_bookings {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Pending
        };

        let booking = self
            .bookings
            .create_checked(NewBooking {
                business_id: business.id,
                customer_id,
                service_id: service.id,
                staff_id: request.staff_id,
                booking_date: request.booking_date,
                booking_time: request.booking_time,
                duration_minutes: service.duration_minutes,
                status,
                customer_notes: request.notes.as_deref(),
            })
            .await?;

        tracing::info!(
            booking_id = %booking.id,
            customer_id = %customer_id,
            status = %booking.status,
            "Booking created"
        );

        let confirmation = BookingConfirmation {
            booking_id: booking.id,
            business_name: business.name.clone(),
            service_name: service.name.clone(),
            booking_date: booking.booking_date,
            booking_time: booking.booking_time,
            status: booking.status,
            customer_name: request.name.clone(),
            customer_phone: request.phone.clone(),
            customer_email: request.email.clone(),
        };

        match flow.confirm(confirmation)? {
            BookingFlow::Confirmed(summary) => Ok(summary),
            _ => Err(AppError::Internal(
                "Booking flow did not reach confirmation".to_string(),
            )),
        }
    }

    /// Status lifecycle: validate the requested transition against the
    /// current status, then apply it with a guard on that status so a
    /// concurrent change loses cleanly instead of silently winning.
    #[tracing::instrument(skip(self), fields(booking_id = %booking_id))]
    pub async fn change_status(
        &self,
        business_id: Uuid,
        booking_id: Uuid,
        requested: BookingStatus,
    ) -> Result<Booking, AppError> {
        let current = self
            .bookings
            .get(business_id, booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        current.status.validate_transition(requested)?;

        self.bookings
            .update_status(business_id, booking_id, current.status, requested)
            .await
    }

    async fn active_service(
        &self,
        business: &Business,
        service_id: Uuid,
    ) -> Result<Service, AppError> {
        self.services
            .get(business.id, service_id)
            .await?
            .filter(|s| s.is_active)
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))
    }
}
