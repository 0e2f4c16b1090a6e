//! Booking repository implementation.

use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use lessonhub_core::error::{AppError, ErrorKind};
use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_entity::booking::{
    Booking, BookingStatus, CancelActor, CreateBooking, PaymentStatus,
};

/// Filters for booking collection queries.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    /// Restrict to this lifecycle status.
    pub status: Option<BookingStatus>,
    /// Restrict to lessons on or after this date.
    pub from_date: Option<NaiveDate>,
    /// Restrict to lessons on or before this date.
    pub to_date: Option<NaiveDate>,
}

/// Aggregate row for earnings/analytics queries.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct BookingTotals {
    /// Number of bookings in the window.
    pub bookings: i64,
    /// Sum of completed-lesson hours.
    pub lesson_hours: i64,
    /// Sum of instructor payouts.
    pub payout_total: f64,
    /// Sum of platform fees.
    pub fee_total: f64,
}

/// Repository for booking CRUD and lifecycle updates.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new booking.
    pub async fn create(&self, booking: &CreateBooking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings \
                (id, learner_id, instructor_id, lesson_date, start_hour, start_time, end_time, \
                 duration_hours, pickup_location, dropoff_location, base_rate, platform_fee, \
                 gst, total_amount, instructor_payout, payment_status, payment_method, \
                 payment_reference, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                     $17, $18, $19) \
             RETURNING *",
        )
        .bind(booking.id)
        .bind(booking.learner_id)
        .bind(booking.instructor_id)
        .bind(booking.lesson_date)
        .bind(booking.start_hour)
        .bind(booking.start_time())
        .bind(booking.end_time())
        .bind(booking.duration_hours)
        .bind(&booking.pickup_location)
        .bind(&booking.dropoff_location)
        .bind(booking.pricing.base_rate)
        .bind(booking.pricing.platform_fee)
        .bind(booking.pricing.gst)
        .bind(booking.pricing.total_amount)
        .bind(booking.pricing.instructor_payout)
        .bind(booking.payment_status)
        .bind(booking.payment_method)
        .bind(&booking.payment_reference)
        .bind(booking.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create booking", e))
    }

    /// Find a booking by id.
    pub async fn find_by_id(&self, booking_id: Uuid) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find booking", e))
    }

    /// Active (pending/confirmed) bookings for an instructor on a date —
    /// the set the overlap rule is checked against.
    pub async fn find_active_on_date(
        &self,
        instructor_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE instructor_id = $1 AND lesson_date = $2 \
               AND status IN ('pending', 'confirmed') \
             ORDER BY created_at",
        )
        .bind(instructor_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list active bookings", e)
        })
    }

    /// Active bookings for an instructor from a date onwards (used when
    /// regeneration re-applies reservations and by the overlap audit).
    pub async fn find_active_from(
        &self,
        instructor_id: Uuid,
        from_date: NaiveDate,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE instructor_id = $1 AND lesson_date >= $2 \
               AND status IN ('pending', 'confirmed') \
             ORDER BY lesson_date, start_hour, created_at",
        )
        .bind(instructor_id)
        .bind(from_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list future bookings", e)
        })
    }

    /// All active bookings from a date onwards, across instructors,
    /// ordered so earlier-created bookings come first per (instructor,
    /// date). Used by the batch overlap corrector.
    pub async fn find_all_active_from(&self, from_date: NaiveDate) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE lesson_date >= $1 AND status IN ('pending', 'confirmed') \
             ORDER BY instructor_id, lesson_date, created_at",
        )
        .bind(from_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list active bookings", e)
        })
    }

    /// List a learner's bookings with optional status/date filters.
    pub async fn list_for_learner(
        &self,
        learner_id: Uuid,
        filter: &BookingFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        self.list_filtered("learner_id", learner_id, filter, page).await
    }

    /// List an instructor's bookings with optional status/date filters.
    pub async fn list_for_instructor(
        &self,
        instructor_id: Uuid,
        filter: &BookingFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        self.list_filtered("instructor_id", instructor_id, filter, page)
            .await
    }

    async fn list_filtered(
        &self,
        owner_column: &str,
        owner_id: Uuid,
        filter: &BookingFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let where_clause = format!(
            "{owner_column} = $1 \
             AND ($2::booking_status IS NULL OR status = $2) \
             AND ($3::date IS NULL OR lesson_date >= $3) \
             AND ($4::date IS NULL OR lesson_date <= $4)"
        );

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM bookings WHERE {where_clause}"))
                .bind(owner_id)
                .bind(filter.status)
                .bind(filter.from_date)
                .bind(filter.to_date)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count bookings", e)
                })?;

        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT * FROM bookings WHERE {where_clause} \
             ORDER BY lesson_date DESC, start_hour DESC LIMIT $5 OFFSET $6"
        ))
        .bind(owner_id)
        .bind(filter.status)
        .bind(filter.from_date)
        .bind(filter.to_date)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list bookings", e))?;

        Ok(PageResponse::new(
            bookings,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Apply a plain status transition (legality is checked by the
    /// service before calling).
    pub async fn update_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update booking status", e)
        })
    }

    /// Mark a booking completed.
    pub async fn complete(&self, booking_id: Uuid) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'completed', completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete booking", e))
    }

    /// Cancel a booking, recording actor, reason, timestamp, and the
    /// resulting payment state.
    pub async fn cancel(
        &self,
        booking_id: Uuid,
        actor: CancelActor,
        reason: &str,
        payment_status: PaymentStatus,
    ) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'cancelled', cancelled_by = $1, cancelled_at = NOW(), \
                cancellation_reason = $2, payment_status = $3, updated_at = NOW() \
             WHERE id = $4 RETURNING *",
        )
        .bind(actor)
        .bind(reason)
        .bind(payment_status)
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to cancel booking", e))
    }

    /// Aggregate totals for an instructor across a date window.
    pub async fn totals_for_instructor(
        &self,
        instructor_id: Uuid,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> AppResult<BookingTotals> {
        sqlx::query_as::<_, BookingTotals>(
            "SELECT COUNT(*) AS bookings, \
                    COALESCE(SUM(duration_hours), 0)::BIGINT AS lesson_hours, \
                    COALESCE(SUM(instructor_payout), 0)::DOUBLE PRECISION AS payout_total, \
                    COALESCE(SUM(platform_fee), 0)::DOUBLE PRECISION AS fee_total \
             FROM bookings \
             WHERE instructor_id = $1 AND lesson_date >= $2 AND lesson_date <= $3 \
               AND status = 'completed'",
        )
        .bind(instructor_id)
        .bind(from_date)
        .bind(to_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to aggregate instructor totals", e)
        })
    }

    /// Platform-wide aggregate totals across a date window.
    pub async fn platform_totals(
        &self,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> AppResult<BookingTotals> {
        sqlx::query_as::<_, BookingTotals>(
            "SELECT COUNT(*) AS bookings, \
                    COALESCE(SUM(duration_hours), 0)::BIGINT AS lesson_hours, \
                    COALESCE(SUM(instructor_payout), 0)::DOUBLE PRECISION AS payout_total, \
                    COALESCE(SUM(platform_fee), 0)::DOUBLE PRECISION AS fee_total \
             FROM bookings \
             WHERE lesson_date >= $1 AND lesson_date <= $2 AND status = 'completed'",
        )
        .bind(from_date)
        .bind(to_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to aggregate platform totals", e)
        })
    }
}
