//! Booking entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::pricing::PricingBreakdown;
use super::status::{BookingStatus, CancelActor, PaymentMethod, PaymentStatus};
use crate::availability::format_slot_label;

/// A lesson booking between a learner and an instructor.
///
/// Bookings are never physically deleted outside explicit administrative
/// action; lifecycle state lives in `status`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Booking identifier.
    pub id: Uuid,
    /// Learner profile reference.
    pub learner_id: Uuid,
    /// Instructor profile reference.
    pub instructor_id: Uuid,
    /// Lesson calendar date.
    pub lesson_date: NaiveDate,
    /// Starting hour-of-day in `[0, 23]`.
    pub start_hour: i16,
    /// Display start time ("9:00 AM").
    pub start_time: String,
    /// Display end time ("11:00 AM").
    pub end_time: String,
    /// Lesson duration in whole hours.
    pub duration_hours: i32,
    /// Pickup location.
    pub pickup_location: Option<String>,
    /// Dropoff location.
    pub dropoff_location: Option<String>,
    /// Base lesson price.
    pub base_rate: f64,
    /// Platform fee (0.10 × base).
    pub platform_fee: f64,
    /// GST (0.10 × base).
    pub gst: f64,
    /// Total charged (1.20 × base).
    pub total_amount: f64,
    /// Instructor payout (0.90 × base).
    pub instructor_payout: f64,
    /// Payment state.
    pub payment_status: PaymentStatus,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// External payment reference, if paid by card.
    pub payment_reference: Option<String>,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Who cancelled, if cancelled.
    pub cancelled_by: Option<CancelActor>,
    /// When the booking was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Why the booking was cancelled.
    pub cancellation_reason: Option<String>,
    /// When the lesson was marked completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// End hour of the lesson (exclusive).
    pub fn end_hour(&self) -> i16 {
        self.start_hour + self.duration_hours as i16
    }

    /// The hours this lesson occupies.
    pub fn occupied_hours(&self) -> impl Iterator<Item = i16> + use<> {
        self.start_hour..self.end_hour()
    }

    /// Half-open interval overlap against another lesson on the same date.
    pub fn overlaps(&self, other: &Booking) -> bool {
        self.instructor_id == other.instructor_id
            && self.lesson_date == other.lesson_date
            && self.start_hour < other.end_hour()
            && self.end_hour() > other.start_hour
    }
}

/// Data required to insert a new booking.
///
/// The id is generated by the caller so slots can be reserved under it
/// before the row exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooking {
    /// Pre-generated booking identifier.
    pub id: Uuid,
    /// Learner profile reference.
    pub learner_id: Uuid,
    /// Instructor profile reference.
    pub instructor_id: Uuid,
    /// Lesson calendar date.
    pub lesson_date: NaiveDate,
    /// Starting hour-of-day.
    pub start_hour: i16,
    /// Lesson duration in whole hours.
    pub duration_hours: i32,
    /// Pickup location.
    pub pickup_location: Option<String>,
    /// Dropoff location.
    pub dropoff_location: Option<String>,
    /// Pricing computed at creation.
    pub pricing: PricingBreakdown,
    /// Payment state at creation.
    pub payment_status: PaymentStatus,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// External payment reference, if any.
    pub payment_reference: Option<String>,
    /// Initial lifecycle state.
    pub status: BookingStatus,
}

impl CreateBooking {
    /// Display start time for the stored record.
    pub fn start_time(&self) -> String {
        format_slot_label(self.start_hour)
    }

    /// Display end time for the stored record.
    pub fn end_time(&self) -> String {
        format_slot_label(self.start_hour + self.duration_hours as i16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(start_hour: i16, duration: i32) -> Booking {
        let instructor = Uuid::new_v4();
        booking_for(instructor, start_hour, duration)
    }

    fn booking_for(instructor_id: Uuid, start_hour: i16, duration: i32) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            learner_id: Uuid::new_v4(),
            instructor_id,
            lesson_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            start_hour,
            start_time: format_slot_label(start_hour),
            end_time: format_slot_label(start_hour + duration as i16),
            duration_hours: duration,
            pickup_location: None,
            dropoff_location: None,
            base_rate: 80.0,
            platform_fee: 8.0,
            gst: 8.0,
            total_amount: 96.0,
            instructor_payout: 72.0,
            payment_status: PaymentStatus::Paid,
            payment_method: PaymentMethod::Credits,
            payment_reference: None,
            status: BookingStatus::Confirmed,
            cancelled_by: None,
            cancelled_at: None,
            cancellation_reason: None,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_half_open_overlap() {
        let instructor = Uuid::new_v4();
        let a = booking_for(instructor, 9, 2); // [9, 11)
        let b = booking_for(instructor, 10, 1); // [10, 11)
        let c = booking_for(instructor, 11, 1); // [11, 12) — adjacent, no overlap
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_no_overlap_across_instructors() {
        let a = booking(9, 2);
        let b = booking(9, 2);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_occupied_hours() {
        let a = booking(8, 3);
        let hours: Vec<i16> = a.occupied_hours().collect();
        assert_eq!(hours, vec![8, 9, 10]);
    }
}
