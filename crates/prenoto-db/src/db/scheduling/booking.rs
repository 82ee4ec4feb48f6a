use chrono::{NaiveDate, NaiveTime};
use prenoto_core::{
    models::{Booking, BookingDetails, BookingStatus},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, business_id, customer_id, service_id, staff_id, booking_date, \
     booking_time, status, customer_notes, internal_notes, notification_sent, reminder_sent, \
     created_at, updated_at";

const DETAILS_SELECT: &str = r#"
    SELECT b.id, b.booking_date, b.booking_time, b.status, b.customer_notes, b.internal_notes,
           c.id AS customer_id, c.name AS customer_name, c.phone AS customer_phone,
           c.email AS customer_email,
           s.id AS service_id, s.name AS service_name,
           s.duration_minutes AS service_duration_minutes, s.price AS service_price,
           st.id AS staff_id, st.name AS staff_name,
           b.created_at
    FROM bookings b
    JOIN customers c ON c.id = b.customer_id
    JOIN services s ON s.id = b.service_id
    LEFT JOIN staff st ON st.id = b.staff_id
"#;

/// Parameters for inserting one booking row.
#[derive(Debug)]
pub struct NewBooking<'a> {
    pub business_id: Uuid,
    pub customer_id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub duration_minutes: i32,
    pub status: BookingStatus,
    pub customer_notes: Option<&'a str>,
}

/// Repository for bookings.
#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a booking after checking its window against existing rows.
    ///
    /// The check and the insert run in one transaction serialized per
    /// (business, date) by an advisory lock, so two concurrent submissions
    /// for the same window cannot both pass the check. Cancelled and
    /// no-show rows release their window. When a staff member is requested
    /// the check narrows to that member; an unassigned booking blocks the
    /// whole window.
    #[tracing::instrument(skip(self, new), fields(db.table = "bookings", db.operation = "insert"))]
    pub async fn create_checked(&self, new: NewBooking<'_>) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1 || '@' || $2))")
            .bind(new.business_id.to_string())
            .bind(new.booking_date.to_string())
            .execute(&mut *tx)
            .await?;

        let conflict: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM bookings b
                JOIN services s ON s.id = b.service_id
                WHERE b.business_id = $1
                  AND b.booking_date = $2
                  AND b.status NOT IN ('cancelled', 'no_show')
                  AND ($5::uuid IS NULL OR b.staff_id IS NULL OR b.staff_id = $5)
                  AND (b.booking_time, b.booking_time + make_interval(mins => s.duration_minutes))
                      OVERLAPS ($3::time, $3::time + make_interval(mins => $4))
            )
            "#,
        )
        .bind(new.business_id)
        .bind(new.booking_date)
        .bind(new.booking_time)
        .bind(new.duration_minutes)
        .bind(new.staff_id)
        .fetch_one(&mut *tx)
        .await?;

        if conflict {
            return Err(AppError::SlotUnavailable {
                date: new.booking_date.to_string(),
                time: new.booking_time.format("%H:%M").to_string(),
            });
        }

        let booking = sqlx::query_as::<Postgres, Booking>(&format!(
            r#"
            INSERT INTO bookings (business_id, customer_id, service_id, staff_id,
                                  booking_date, booking_time, status, customer_notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {BOOKING_COLUMNS}
            "#,
        ))
        .bind(new.business_id)
        .bind(new.customer_id)
        .bind(new.service_id)
        .bind(new.staff_id)
        .bind(new.booking_date)
        .bind(new.booking_time)
        .bind(new.status)
        .bind(new.customer_notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(booking)
    }

    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<Postgres, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE business_id = $1 AND id = $2",
        ))
        .bind(business_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "select", db.record_id = %id))]
    pub async fn get_details(
        &self,
        business_id: Uuid,
        id: Uuid,
    ) -> Result<Option<BookingDetails>, AppError> {
        let details = sqlx::query_as::<Postgres, BookingDetails>(&format!(
            "{DETAILS_SELECT} WHERE b.business_id = $1 AND b.id = $2",
        ))
        .bind(business_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(details)
    }

    /// Agenda listing with optional date bounds and customer search,
    /// ordered by date then time.
    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "select"))]
    pub async fn list_details(
        &self,
        business_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        search: Option<&str>,
    ) -> Result<Vec<BookingDetails>, AppError> {
        let bookings = sqlx::query_as::<Postgres, BookingDetails>(&format!(
            r#"
            {DETAILS_SELECT}
            WHERE b.business_id = $1
              AND ($2::date IS NULL OR b.booking_date >= $2)
              AND ($3::date IS NULL OR b.booking_date <= $3)
              AND ($4::text IS NULL OR c.name ILIKE '%' || $4 || '%' OR c.phone LIKE '%' || $4 || '%')
            ORDER BY b.booking_date ASC, b.booking_time ASC
            "#,
        ))
        .bind(business_id)
        .bind(from)
        .bind(to)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Occupied windows for a date: start time plus service duration of
    /// every booking that still holds its slot. Feeds the public slot list.
    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "select"))]
    pub async fn booked_windows(
        &self,
        business_id: Uuid,
        date: NaiveDate,
        staff_id: Option<Uuid>,
    ) -> Result<Vec<(NaiveTime, i32)>, AppError> {
        let windows: Vec<(NaiveTime, i32)> = sqlx::query_as(
            r#"
            SELECT b.booking_time, s.duration_minutes
            FROM bookings b
            JOIN services s ON s.id = b.service_id
            WHERE b.business_id = $1
              AND b.booking_date = $2
              AND b.status NOT IN ('cancelled', 'no_show')
              AND ($3::uuid IS NULL OR b.staff_id IS NULL OR b.staff_id = $3)
            ORDER BY b.booking_time ASC
            "#,
        )
        .bind(business_id)
        .bind(date)
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(windows)
    }

    /// Guarded status write: applies only while the stored status still is
    /// `from`. Zero rows means the booking moved concurrently (or does not
    /// exist) and the caller's transition validation no longer holds.
    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "update", db.record_id = %id))]
    pub async fn update_status(
        &self,
        business_id: Uuid,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<Postgres, Booking>(&format!(
            r#"
            UPDATE bookings SET status = $4, updated_at = NOW()
            WHERE business_id = $1 AND id = $2 AND status = $3
            RETURNING {BOOKING_COLUMNS}
            "#,
        ))
        .bind(business_id)
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Conflict("Booking status changed concurrently".to_string()))?;

        Ok(booking)
    }

    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "update", db.record_id = %id))]
    pub async fn update_internal_notes(
        &self,
        business_id: Uuid,
        id: Uuid,
        internal_notes: Option<&str>,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<Postgres, Booking>(&format!(
            r#"
            UPDATE bookings SET internal_notes = $3, updated_at = NOW()
            WHERE business_id = $1 AND id = $2
            RETURNING {BOOKING_COLUMNS}
            "#,
        ))
        .bind(business_id)
        .bind(id)
        .bind(internal_notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        Ok(booking)
    }

    /// Per-status booking counts in a date window, for the statistics
    /// summary.
    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "select"))]
    pub async fn counts_by_status(
        &self,
        business_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(BookingStatus, i64)>, AppError> {
        let counts: Vec<(BookingStatus, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM bookings \
             WHERE business_id = $1 AND booking_date BETWEEN $2 AND $3 \
             GROUP BY status",
        )
        .bind(business_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
