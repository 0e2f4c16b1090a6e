//! Dated slot inventory entities and slot-time handling.

pub mod model;
pub mod slot;

pub use model::{AvailabilityDay, AvailabilityDayRow, TimeSlot};
pub use slot::{format_slot_label, parse_slot_hour};
