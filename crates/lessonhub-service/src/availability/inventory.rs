//! Slot inventory: windowed reads with notice filtering, and
//! reservation/release orchestration.

use std::sync::Arc;

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_database::repositories::availability::AvailabilityRepository;
use lessonhub_entity::availability::AvailabilityDay;
use lessonhub_entity::instructor::InstructorProfile;

/// Read/write operations over the dated slot inventory.
#[derive(Debug, Clone)]
pub struct SlotInventory {
    availability_repo: Arc<AvailabilityRepository>,
}

/// Clamp a requested window to `[today, today + max_advance_days]`.
pub fn clamp_window(
    requested_from: Option<NaiveDate>,
    requested_to: Option<NaiveDate>,
    today: NaiveDate,
    max_advance_days: u32,
) -> (NaiveDate, NaiveDate) {
    let horizon = today
        .checked_add_days(Days::new(max_advance_days as u64))
        .unwrap_or(today);

    let from = requested_from.unwrap_or(today).clamp(today, horizon);
    let to = requested_to.unwrap_or(horizon).clamp(from, horizon);
    (from, to)
}

/// A slot is bookable only if its absolute date-time is at or after
/// `now + min_notice_hours`.
pub fn slot_is_bookable(
    date: NaiveDate,
    slot_hour: i16,
    now: DateTime<Utc>,
    min_notice_hours: u32,
) -> bool {
    let Some(slot_time) = date.and_hms_opt(slot_hour as u32, 0, 0) else {
        return false;
    };
    slot_time >= now.naive_utc() + Duration::hours(min_notice_hours as i64)
}

impl SlotInventory {
    /// Creates a new slot inventory service.
    pub fn new(availability_repo: Arc<AvailabilityRepository>) -> Self {
        Self { availability_repo }
    }

    /// List an instructor's availability across a date window.
    ///
    /// The window is clamped to the instructor's advance-booking horizon
    /// and slots inside the minimum-notice threshold are filtered out.
    pub async fn list_for_instructor(
        &self,
        profile: &InstructorProfile,
        requested_from: Option<NaiveDate>,
        requested_to: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<AvailabilityDay>> {
        let settings = &profile.calendar_settings.0;
        let (from, to) = clamp_window(
            requested_from,
            requested_to,
            now.date_naive(),
            settings.max_advance_days,
        );

        let mut days = self
            .availability_repo
            .find_window(profile.id, from, to)
            .await?;

        for day in &mut days {
            day.slots
                .retain(|slot| slot_is_bookable(day.date, slot.slot_hour, now, settings.min_notice_hours));
        }
        days.retain(|day| !day.slots.is_empty());

        Ok(days)
    }

    /// Reserve every hour of a lesson for a booking, atomically per slot.
    ///
    /// Each hour is a guarded update; if any hour is already taken (or
    /// does not exist), the hours taken so far are released and the whole
    /// reservation fails with a conflict.
    pub async fn reserve_lesson(
        &self,
        instructor_id: Uuid,
        date: NaiveDate,
        start_hour: i16,
        duration_hours: i32,
        booking_id: Uuid,
    ) -> AppResult<()> {
        for hour in start_hour..start_hour + duration_hours as i16 {
            let reserved = self
                .availability_repo
                .reserve_slot(instructor_id, date, hour, booking_id)
                .await?;

            if !reserved {
                self.availability_repo
                    .release_slots_for_booking(booking_id)
                    .await?;
                debug!(
                    %instructor_id, %date, hour,
                    "Slot reservation failed, rolled back partial hold"
                );
                return Err(AppError::conflict(
                    "The requested time slot is no longer available",
                ));
            }
        }
        Ok(())
    }

    /// Release every slot held by a booking. Idempotent.
    pub async fn release_lesson(&self, booking_id: Uuid) -> AppResult<u64> {
        self.availability_repo
            .release_slots_for_booking(booking_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_clamp_window_defaults_to_full_horizon() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let (from, to) = clamp_window(None, None, today, 14);
        assert_eq!(from, today);
        assert_eq!(to, today.checked_add_days(Days::new(14)).unwrap());
    }

    #[test]
    fn test_clamp_window_rejects_past_and_far_future() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let (from, to) = clamp_window(
            NaiveDate::from_ymd_opt(2025, 5, 1),
            NaiveDate::from_ymd_opt(2025, 12, 31),
            today,
            7,
        );
        assert_eq!(from, today);
        assert_eq!(to, today.checked_add_days(Days::new(7)).unwrap());
    }

    #[test]
    fn test_min_notice_filtering() {
        // 8 AM on June 2nd.
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap();
        let today = now.date_naive();

        // With 12 hours notice, the 9 AM slot today is not bookable, but
        // tomorrow's is.
        assert!(!slot_is_bookable(today, 9, now, 12));
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap();
        assert!(slot_is_bookable(tomorrow, 9, now, 12));

        // The threshold itself is bookable (8 PM today with 12h notice).
        assert!(slot_is_bookable(today, 20, now, 12));
        assert!(!slot_is_bookable(today, 19, now, 12));
    }
}
