//! Scheduling defaults applied when an instructor has not configured
//! their own calendar settings.

use serde::{Deserialize, Serialize};

/// Calendar defaults for the availability generator and slot inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// How far ahead (in days) slot inventory is generated and bookable.
    #[serde(default = "default_max_advance_days")]
    pub default_max_advance_days: u32,
    /// Minimum notice (in hours) before a slot becomes unbookable.
    #[serde(default = "default_min_notice_hours")]
    pub default_min_notice_hours: u32,
    /// Slot grain in hours. Lessons are booked in whole-slot multiples.
    #[serde(default = "default_slot_duration_hours")]
    pub default_slot_duration_hours: u32,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            default_max_advance_days: default_max_advance_days(),
            default_min_notice_hours: default_min_notice_hours(),
            default_slot_duration_hours: default_slot_duration_hours(),
        }
    }
}

fn default_max_advance_days() -> u32 {
    14
}

fn default_min_notice_hours() -> u32 {
    12
}

fn default_slot_duration_hours() -> u32 {
    1
}
