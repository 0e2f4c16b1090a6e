//! Interval overlap detection and the later-created-loses corrector.

use uuid::Uuid;

use lessonhub_entity::booking::Booking;

/// Half-open interval intersection: `[a_start, a_end)` overlaps
/// `[b_start, b_end)` iff `a_start < b_end && a_end > b_start`.
pub fn hours_overlap(a_start: i16, a_end: i16, b_start: i16, b_end: i16) -> bool {
    a_start < b_end && a_end > b_start
}

/// Find the existing bookings a candidate interval would collide with.
pub fn find_conflicts<'a>(
    start_hour: i16,
    duration_hours: i32,
    existing: &'a [Booking],
) -> Vec<&'a Booking> {
    let end_hour = start_hour + duration_hours as i16;
    existing
        .iter()
        .filter(|b| b.status.is_active() && hours_overlap(start_hour, end_hour, b.start_hour, b.end_hour()))
        .collect()
}

/// Given active bookings (pre-sorted by instructor, date, creation time),
/// return the ids of later-created bookings that overlap an
/// earlier-created survivor. Earlier-created bookings win ties; the
/// losers are the ones the corrector cancels.
pub fn later_created_losers(bookings: &[Booking]) -> Vec<Uuid> {
    let mut losers = Vec::new();
    let mut accepted: Vec<&Booking> = Vec::new();

    for booking in bookings {
        let conflicts = accepted.iter().any(|kept| booking.overlaps(kept));
        if conflicts {
            losers.push(booking.id);
        } else {
            accepted.push(booking);
        }
    }

    losers
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use lessonhub_entity::availability::format_slot_label;
    use lessonhub_entity::booking::{BookingStatus, PaymentMethod, PaymentStatus};

    fn booking_at(
        instructor_id: Uuid,
        start_hour: i16,
        duration: i32,
        created_minute: u32,
    ) -> Booking {
        let created = Utc
            .with_ymd_and_hms(2025, 6, 1, 10, created_minute, 0)
            .unwrap();
        Booking {
            id: Uuid::new_v4(),
            learner_id: Uuid::new_v4(),
            instructor_id,
            lesson_date: NaiveDate::from_ymd_opt(2025, 6, 9).unwrap(),
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
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_hours_overlap_half_open() {
        assert!(hours_overlap(9, 11, 10, 12));
        assert!(hours_overlap(10, 12, 9, 11));
        assert!(hours_overlap(9, 11, 9, 11));
        // Adjacent intervals do not overlap.
        assert!(!hours_overlap(9, 11, 11, 12));
        assert!(!hours_overlap(11, 12, 9, 11));
    }

    #[test]
    fn test_find_conflicts_ignores_inactive() {
        let instructor = Uuid::new_v4();
        let mut cancelled = booking_at(instructor, 9, 2, 0);
        cancelled.status = BookingStatus::Cancelled;
        let active = booking_at(instructor, 10, 1, 1);

        let existing = vec![cancelled, active];
        let conflicts = find_conflicts(9, 2, &existing);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].start_hour, 10);
    }

    #[test]
    fn test_later_created_loses() {
        let instructor = Uuid::new_v4();
        let first = booking_at(instructor, 9, 2, 0);
        let second = booking_at(instructor, 10, 2, 5); // overlaps first, newer
        let third = booking_at(instructor, 12, 1, 6); // clear

        let losers = later_created_losers(&[first.clone(), second.clone(), third]);
        assert_eq!(losers, vec![second.id]);
    }

    #[test]
    fn test_chain_of_overlaps_keeps_earliest_only() {
        let instructor = Uuid::new_v4();
        let a = booking_at(instructor, 9, 2, 0); // [9, 11) survives
        let b = booking_at(instructor, 10, 2, 1); // overlaps a → loser
        let c = booking_at(instructor, 11, 1, 2); // [11, 12) does not overlap a → survives
        let losers = later_created_losers(&[a, b.clone(), c]);
        assert_eq!(losers, vec![b.id]);
    }

    #[test]
    fn test_no_losers_without_overlap() {
        let instructor = Uuid::new_v4();
        let a = booking_at(instructor, 9, 1, 0);
        let b = booking_at(instructor, 10, 1, 1);
        assert!(later_created_losers(&[a, b]).is_empty());
    }
}
