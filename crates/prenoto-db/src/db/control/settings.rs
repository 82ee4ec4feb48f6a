use prenoto_core::{
    models::{BusinessSettings, UpdateSettingsRequest},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const SETTINGS_COLUMNS: &str = "business_id, booking_buffer_minutes, advance_booking_days, \
     cancellation_hours, auto_confirm_bookings, send_email_notifications, opening_hour, \
     closing_hour, updated_at";

/// Repository for per-business settings.
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "business_settings", db.operation = "select"))]
    pub async fn get(&self, business_id: Uuid) -> Result<BusinessSettings, AppError> {
        let settings = sqlx::query_as::<Postgres, BusinessSettings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM business_settings WHERE business_id = $1",
        ))
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Business settings not found".to_string()))?;

        Ok(settings)
    }

    /// Partial update; absent fields keep their value. Rejects a closing
    /// hour at or before the opening hour, which would make the slot list
    /// permanently empty.
    #[tracing::instrument(skip(self, request), fields(db.table = "business_settings", db.operation = "update"))]
    pub async fn update(
        &self,
        business_id: Uuid,
        request: &UpdateSettingsRequest,
    ) -> Result<BusinessSettings, AppError> {
        let current = self.get(business_id).await?;
        let opening = request.opening_hour.unwrap_or(current.opening_hour);
        let closing = request.closing_hour.unwrap_or(current.closing_hour);
        if opening >= closing {
            return Err(AppError::InvalidInput(format!(
                "Opening hour {} must be before closing hour {}",
                opening, closing
            )));
        }

        let settings = sqlx::query_as::<Postgres, BusinessSettings>(&format!(
            r#"
            UPDATE business_settings SET
                booking_buffer_minutes = COALESCE($2, booking_buffer_minutes),
                advance_booking_days = COALESCE($3, advance_booking_days),
                cancellation_hours = COALESCE($4, cancellation_hours),
                auto_confirm_bookings = COALESCE($5, auto_confirm_bookings),
                send_email_notifications = COALESCE($6, send_email_notifications),
                opening_hour = COALESCE($7, opening_hour),
                closing_hour = COALESCE($8, closing_hour),
                updated_at = NOW()
            WHERE business_id = $1
            RETURNING {SETTINGS_COLUMNS}
            "#,
        ))
        .bind(business_id)
        .bind(request.booking_buffer_minutes)
        .bind(request.advance_booking_days)
        .bind(request.cancellation_hours)
        .bind(request.auto_confirm_bookings)
        .bind(request.send_email_notifications)
        .bind(request.opening_hour)
        .bind(request.closing_hour)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }
}
