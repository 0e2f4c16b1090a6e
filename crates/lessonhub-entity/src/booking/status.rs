//! Booking lifecycle status and related enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a lesson booking.
///
/// Legal transitions:
/// `pending → confirmed → in_progress → completed`,
/// `pending/confirmed → cancelled`, `confirmed/in_progress → no_show`,
/// and any non-terminal state → `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Active bookings hold slot reservations and count for overlap checks.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether a transition from `self` to `next` is legal.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        match (self, next) {
            (Pending, Confirmed) => true,
            (Pending | Confirmed, Cancelled) => true,
            (Confirmed, InProgress) => true,
            (Pending | Confirmed | InProgress, Completed) => true,
            (Confirmed | InProgress, NoShow) => true,
            _ => false,
        }
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who cancelled a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "cancel_actor", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CancelActor {
    Learner,
    Instructor,
    /// Administrative or automated correction (overlap audit, payment
    /// failure).
    System,
}

/// Payment state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Funds captured (credits debited or verified card payment).
    Paid,
    /// Credits refunded after cancellation.
    Refunded,
    /// The processor reported the payment failed.
    Failed,
}

/// How a booking was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Settled from the learner's prepaid credit balance.
    Credits,
    /// Settled from a verified external card payment.
    Card,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::InProgress));
        assert!(BookingStatus::InProgress.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn test_cancellation_only_from_active() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn test_confirm_only_from_pending() {
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::NoShow.can_transition_to(BookingStatus::Confirmed));
    }

    #[test]
    fn test_any_non_terminal_can_complete() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::InProgress,
        ] {
            assert!(status.can_transition_to(BookingStatus::Completed));
        }
        for status in [
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::NoShow,
        ] {
            assert!(status.is_terminal());
            assert!(!status.can_transition_to(BookingStatus::Completed));
        }
    }
}
