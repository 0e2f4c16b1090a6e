//! Availability day and time-slot repository.
//!
//! Slot reservation is a single guarded UPDATE — the storage-layer
//! compare-and-swap that makes concurrent double-booking impossible.
//! Release is unconditional and idempotent.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use lessonhub_core::error::{AppError, ErrorKind};
use lessonhub_core::result::AppResult;
use lessonhub_entity::availability::{AvailabilityDay, AvailabilityDayRow, TimeSlot};

/// Repository for slot inventory.
#[derive(Debug, Clone)]
pub struct AvailabilityRepository {
    pool: PgPool,
}

impl AvailabilityRepository {
    /// Create a new availability repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert the day row for (instructor, date).
    pub async fn upsert_day(
        &self,
        instructor_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<AvailabilityDayRow> {
        sqlx::query_as::<_, AvailabilityDayRow>(
            "INSERT INTO availability_days (instructor_id, date) VALUES ($1, $2) \
             ON CONFLICT (instructor_id, date) DO UPDATE SET date = EXCLUDED.date \
             RETURNING *",
        )
        .bind(instructor_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to upsert availability day", e)
        })
    }

    /// Insert a fresh, available slot. No-op if the (day, hour) already
    /// exists.
    pub async fn insert_slot(&self, day_id: Uuid, slot_hour: i16, label: &str) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO time_slots (day_id, slot_hour, label) VALUES ($1, $2, $3) \
             ON CONFLICT (day_id, slot_hour) DO NOTHING",
        )
        .bind(day_id)
        .bind(slot_hour)
        .bind(label)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert slot", e))?;
        Ok(())
    }

    /// Insert a slot that is already reserved by a booking, overwriting an
    /// unreserved slot at the same (day, hour) if one exists. Used when
    /// regeneration re-applies reservations.
    pub async fn insert_reserved_slot(
        &self,
        day_id: Uuid,
        slot_hour: i16,
        label: &str,
        booking_id: Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO time_slots (day_id, slot_hour, label, is_available, booking_id) \
             VALUES ($1, $2, $3, FALSE, $4) \
             ON CONFLICT (day_id, slot_hour) DO UPDATE \
                SET is_available = FALSE, booking_id = EXCLUDED.booking_id",
        )
        .bind(day_id)
        .bind(slot_hour)
        .bind(label)
        .bind(booking_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert reserved slot", e)
        })?;
        Ok(())
    }

    /// Delete all availability days (and their slots, via cascade) for an
    /// instructor from `from_date` onwards. The destructive half of
    /// regeneration.
    pub async fn delete_days_from(&self, instructor_id: Uuid, from_date: NaiveDate) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM availability_days WHERE instructor_id = $1 AND date >= $2")
                .bind(instructor_id)
                .bind(from_date)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to delete availability days",
                        e,
                    )
                })?;
        Ok(result.rows_affected())
    }

    /// Fetch the availability days (with slots attached, ordered by hour)
    /// for an instructor across a date window.
    pub async fn find_window(
        &self,
        instructor_id: Uuid,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> AppResult<Vec<AvailabilityDay>> {
        let days = sqlx::query_as::<_, AvailabilityDayRow>(
            "SELECT * FROM availability_days \
             WHERE instructor_id = $1 AND date >= $2 AND date <= $3 \
             ORDER BY date",
        )
        .bind(instructor_id)
        .bind(from_date)
        .bind(to_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list availability days", e)
        })?;

        let slots = sqlx::query_as::<_, TimeSlot>(
            "SELECT ts.* FROM time_slots ts \
             JOIN availability_days d ON ts.day_id = d.id \
             WHERE d.instructor_id = $1 AND d.date >= $2 AND d.date <= $3 \
             ORDER BY ts.slot_hour",
        )
        .bind(instructor_id)
        .bind(from_date)
        .bind(to_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list slots", e))?;

        let mut result: Vec<AvailabilityDay> = days
            .into_iter()
            .map(|row| AvailabilityDay {
                id: row.id,
                instructor_id: row.instructor_id,
                date: row.date,
                slots: Vec::new(),
                created_at: row.created_at,
            })
            .collect();

        for slot in slots {
            if let Some(day) = result.iter_mut().find(|d| d.id == slot.day_id) {
                day.slots.push(slot);
            }
        }

        Ok(result)
    }

    /// Atomically reserve the slot at (instructor, date, hour) for a
    /// booking. Returns `false` if the slot does not exist or is already
    /// reserved — the caller must not assume success.
    pub async fn reserve_slot(
        &self,
        instructor_id: Uuid,
        date: NaiveDate,
        slot_hour: i16,
        booking_id: Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE time_slots SET is_available = FALSE, booking_id = $4 \
             WHERE slot_hour = $3 AND is_available = TRUE \
               AND day_id = (SELECT id FROM availability_days \
                             WHERE instructor_id = $1 AND date = $2)",
        )
        .bind(instructor_id)
        .bind(date)
        .bind(slot_hour)
        .bind(booking_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reserve slot", e))?;

        Ok(result.rows_affected() == 1)
    }

    /// Release every slot held by a booking. Idempotent: releasing an
    /// already-free booking reference is a no-op.
    pub async fn release_slots_for_booking(&self, booking_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE time_slots SET is_available = TRUE, booking_id = NULL WHERE booking_id = $1",
        )
        .bind(booking_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to release slots", e))?;
        Ok(result.rows_affected())
    }
}
