//! Availability day and time slot models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One hourly bookable unit on a given calendar date for one instructor.
///
/// Invariant: `is_available` is true iff `booking_id` is null. Reservation
/// flips both in a single guarded update.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimeSlot {
    /// Slot identifier.
    pub id: Uuid,
    /// Owning availability day.
    pub day_id: Uuid,
    /// Hour-of-day in `[0, 23]`.
    pub slot_hour: i16,
    /// 12-hour display label ("9:00 AM").
    pub label: String,
    /// Whether the slot can currently be reserved.
    pub is_available: bool,
    /// The booking holding this slot, if reserved.
    pub booking_id: Option<Uuid>,
}

/// The per-(instructor, date) container of slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityDay {
    /// Day identifier.
    pub id: Uuid,
    /// Owning instructor profile.
    pub instructor_id: Uuid,
    /// Calendar date.
    pub date: NaiveDate,
    /// Ordered slots for the day.
    pub slots: Vec<TimeSlot>,
    /// When the day record was generated.
    pub created_at: DateTime<Utc>,
}

/// Day row as stored, before slots are attached.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AvailabilityDayRow {
    /// Day identifier.
    pub id: Uuid,
    /// Owning instructor profile.
    pub instructor_id: Uuid,
    /// Calendar date.
    pub date: NaiveDate,
    /// When the day record was generated.
    pub created_at: DateTime<Utc>,
}
