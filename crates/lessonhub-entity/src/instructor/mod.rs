//! Instructor profile entities: weekly opening-hours template, calendar
//! settings, and pricing.

pub mod model;
pub mod schedule;

pub use model::{CreateInstructorProfile, InstructorProfile, UpdateInstructorProfile};
pub use schedule::{CalendarSettings, TimeRange, WeeklySchedule};
