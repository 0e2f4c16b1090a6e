//! Weekly opening-hours template and calendar settings.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// A single `{start, end}` interval on the 24-hour clock, stored as
/// display strings ("08:00", "5:00 PM"). Parsing to an hour-of-day
/// integer happens in the availability module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Interval start.
    pub start: String,
    /// Interval end (exclusive).
    pub end: String,
}

/// Weekly opening-hours template: an ordered interval list per weekday.
///
/// Days with an empty list produce no availability. Stored as JSONB on the
/// instructor profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    #[serde(default)]
    pub monday: Vec<TimeRange>,
    #[serde(default)]
    pub tuesday: Vec<TimeRange>,
    #[serde(default)]
    pub wednesday: Vec<TimeRange>,
    #[serde(default)]
    pub thursday: Vec<TimeRange>,
    #[serde(default)]
    pub friday: Vec<TimeRange>,
    #[serde(default)]
    pub saturday: Vec<TimeRange>,
    #[serde(default)]
    pub sunday: Vec<TimeRange>,
}

impl WeeklySchedule {
    /// Return the interval list for a calendar weekday.
    pub fn for_weekday(&self, weekday: Weekday) -> &[TimeRange] {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    /// Whether the template has no opening hours at all.
    pub fn is_empty(&self) -> bool {
        self.monday.is_empty()
            && self.tuesday.is_empty()
            && self.wednesday.is_empty()
            && self.thursday.is_empty()
            && self.friday.is_empty()
            && self.saturday.is_empty()
            && self.sunday.is_empty()
    }
}

/// Per-instructor calendar behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSettings {
    /// Minimum notice in hours before a slot becomes unbookable.
    #[serde(default = "default_min_notice_hours")]
    pub min_notice_hours: u32,
    /// How far ahead (days) the slot inventory extends.
    #[serde(default = "default_max_advance_days")]
    pub max_advance_days: u32,
    /// Slot grain in hours.
    #[serde(default = "default_slot_duration_hours")]
    pub slot_duration_hours: u32,
    /// Travel buffer between lessons, in minutes.
    #[serde(default)]
    pub travel_buffer_minutes: u32,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            min_notice_hours: default_min_notice_hours(),
            max_advance_days: default_max_advance_days(),
            slot_duration_hours: default_slot_duration_hours(),
            travel_buffer_minutes: 0,
        }
    }
}

fn default_min_notice_hours() -> u32 {
    12
}

fn default_max_advance_days() -> u32 {
    14
}

fn default_slot_duration_hours() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_lookup() {
        let schedule = WeeklySchedule {
            monday: vec![TimeRange {
                start: "08:00".to_string(),
                end: "11:00".to_string(),
            }],
            ..Default::default()
        };
        assert_eq!(schedule.for_weekday(Weekday::Mon).len(), 1);
        assert!(schedule.for_weekday(Weekday::Tue).is_empty());
        assert!(!schedule.is_empty());
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: CalendarSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.min_notice_hours, 12);
        assert_eq!(settings.max_advance_days, 14);
        assert_eq!(settings.slot_duration_hours, 1);
    }
}
