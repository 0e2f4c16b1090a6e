//! Availability generator: expands a weekly opening-hours template into
//! dated hourly slot inventory.
//!
//! Regeneration is destructive-then-additive: future days are deleted and
//! recomputed from the template. Reservations held by live bookings are
//! re-applied afterwards from the bookings table, so a reserved slot is
//! never silently freed — even when the new template no longer covers
//! that hour.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, Utc};
use tracing::{info, warn};

use lessonhub_core::result::AppResult;
use lessonhub_database::repositories::availability::AvailabilityRepository;
use lessonhub_database::repositories::booking::BookingRepository;
use lessonhub_entity::availability::{format_slot_label, parse_slot_hour};
use lessonhub_entity::instructor::{CalendarSettings, InstructorProfile, WeeklySchedule};

/// One generated day: a date plus the slot hours it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDay {
    /// Calendar date.
    pub date: NaiveDate,
    /// Slot hours, sorted and de-duplicated.
    pub hours: Vec<i16>,
}

/// Outcome of a regeneration run.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RegenerationSummary {
    /// Days written.
    pub days_generated: u64,
    /// Fresh slots written.
    pub slots_generated: u64,
    /// Reservations re-applied for live bookings.
    pub reservations_reapplied: u64,
}

/// Expands weekly templates into dated slot inventory.
#[derive(Debug, Clone)]
pub struct AvailabilityGenerator {
    availability_repo: Arc<AvailabilityRepository>,
    booking_repo: Arc<BookingRepository>,
}

impl AvailabilityGenerator {
    /// Creates a new generator.
    pub fn new(
        availability_repo: Arc<AvailabilityRepository>,
        booking_repo: Arc<BookingRepository>,
    ) -> Self {
        Self {
            availability_repo,
            booking_repo,
        }
    }

    /// Pure expansion of a template across `[today, today + max_advance_days)`.
    ///
    /// Each `{start, end}` interval yields consecutive one-hour slots from
    /// `start` inclusive to `end` exclusive, truncated to whole hours.
    /// Days whose weekday has an empty interval list are omitted.
    pub fn expand_template(
        schedule: &WeeklySchedule,
        settings: &CalendarSettings,
        today: NaiveDate,
    ) -> Vec<GeneratedDay> {
        let mut days = Vec::new();

        for offset in 0..settings.max_advance_days {
            let Some(date) = today.checked_add_days(Days::new(offset as u64)) else {
                break;
            };

            let ranges = schedule.for_weekday(date.weekday());
            if ranges.is_empty() {
                continue;
            }

            let mut hours = BTreeSet::new();
            for range in ranges {
                let start = parse_slot_hour(&range.start);
                let end = parse_slot_hour(&range.end);
                for hour in start..end {
                    hours.insert(hour);
                }
            }

            if !hours.is_empty() {
                days.push(GeneratedDay {
                    date,
                    hours: hours.into_iter().collect(),
                });
            }
        }

        days
    }

    /// Regenerate the future slot inventory for an instructor.
    ///
    /// Deletes every not-yet-past availability day, reinserts days and
    /// slots from the current template, then re-reserves the hours held by
    /// live (pending/confirmed) bookings. The bookings table is the
    /// authority for re-application, so orphaned slot linkage heals here
    /// as well.
    pub async fn regenerate(&self, profile: &InstructorProfile) -> AppResult<RegenerationSummary> {
        let today = Utc::now().date_naive();
        let mut summary = RegenerationSummary::default();

        let live_bookings = self
            .booking_repo
            .find_active_from(profile.id, today)
            .await?;

        self.availability_repo
            .delete_days_from(profile.id, today)
            .await?;

        let days = Self::expand_template(
            &profile.opening_hours,
            &profile.calendar_settings,
            today,
        );

        for day in &days {
            let row = self
                .availability_repo
                .upsert_day(profile.id, day.date)
                .await?;
            for &hour in &day.hours {
                self.availability_repo
                    .insert_slot(row.id, hour, &format_slot_label(hour))
                    .await?;
                summary.slots_generated += 1;
            }
            summary.days_generated += 1;
        }

        for booking in &live_bookings {
            let row = self
                .availability_repo
                .upsert_day(profile.id, booking.lesson_date)
                .await?;
            for hour in booking.occupied_hours() {
                self.availability_repo
                    .insert_reserved_slot(row.id, hour, &format_slot_label(hour), booking.id)
                    .await?;
                summary.reservations_reapplied += 1;
            }
        }

        if !live_bookings.is_empty() {
            warn!(
                instructor_id = %profile.id,
                bookings = live_bookings.len(),
                "Re-applied reservations during availability regeneration"
            );
        }

        info!(
            instructor_id = %profile.id,
            days = summary.days_generated,
            slots = summary.slots_generated,
            "Availability regenerated"
        );

        Ok(summary)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use lessonhub_entity::instructor::TimeRange;

    fn monday_template(start: &str, end: &str) -> WeeklySchedule {
        WeeklySchedule {
            monday: vec![TimeRange {
                start: start.to_string(),
                end: end.to_string(),
            }],
            ..Default::default()
        }
    }

    fn settings(max_advance_days: u32) -> CalendarSettings {
        CalendarSettings {
            max_advance_days,
            ..Default::default()
        }
    }

    #[test]
    fn test_monday_template_yields_three_slots() {
        // 2025-06-02 is a Monday.
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(today.weekday(), Weekday::Mon);

        let days = AvailabilityGenerator::expand_template(
            &monday_template("08:00", "11:00"),
            &settings(7),
            today,
        );

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, today);
        assert_eq!(days[0].hours, vec![8, 9, 10]);
        assert_eq!(format_slot_label(days[0].hours[0]), "8:00 AM");
    }

    #[test]
    fn test_window_is_bounded() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let days = AvailabilityGenerator::expand_template(
            &monday_template("08:00", "11:00"),
            &settings(14),
            today,
        );

        // Two Mondays fall inside [today, today + 14).
        assert_eq!(days.len(), 2);
        let horizon = today.checked_add_days(Days::new(14)).unwrap();
        for day in &days {
            assert!(day.date >= today && day.date < horizon);
        }
    }

    #[test]
    fn test_twelve_hour_template_matches_24_hour() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let a = AvailabilityGenerator::expand_template(
            &monday_template("08:00", "11:00"),
            &settings(7),
            today,
        );
        let b = AvailabilityGenerator::expand_template(
            &monday_template("8:00 AM", "11:00 AM"),
            &settings(7),
            today,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_days_produce_no_records() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(); // Tuesday
        let days = AvailabilityGenerator::expand_template(
            &monday_template("08:00", "11:00"),
            &settings(6), // window ends before next Monday
            today,
        );
        assert!(days.is_empty());
    }

    #[test]
    fn test_overlapping_ranges_deduplicate() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let schedule = WeeklySchedule {
            monday: vec![
                TimeRange {
                    start: "08:00".to_string(),
                    end: "11:00".to_string(),
                },
                TimeRange {
                    start: "10:00".to_string(),
                    end: "13:00".to_string(),
                },
            ],
            ..Default::default()
        };
        let days = AvailabilityGenerator::expand_template(&schedule, &settings(1), today);
        assert_eq!(days[0].hours, vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_inverted_range_yields_nothing() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let days = AvailabilityGenerator::expand_template(
            &monday_template("11:00", "08:00"),
            &settings(1),
            today,
        );
        assert!(days.is_empty());
    }

    #[test]
    fn test_expansion_is_deterministic() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let schedule = monday_template("09:00", "17:00");
        let once = AvailabilityGenerator::expand_template(&schedule, &settings(14), today);
        let twice = AvailabilityGenerator::expand_template(&schedule, &settings(14), today);
        assert_eq!(once, twice);
    }
}
