//! In-app notification row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Category of an in-app notification. Stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingConfirmed,
    BookingCancelled,
    LessonReminder,
    CreditsGranted,
    PaymentFailed,
}

impl NotificationKind {
    /// Stable string form used in the database column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BookingConfirmed => "booking_confirmed",
            Self::BookingCancelled => "booking_cancelled",
            Self::LessonReminder => "lesson_reminder",
            Self::CreditsGranted => "credits_granted",
            Self::PaymentFailed => "payment_failed",
        }
    }
}

/// An in-app notification row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Notification identifier.
    pub id: Uuid,
    /// Receiving user.
    pub user_id: Uuid,
    /// Notification kind (stored as text).
    pub kind: String,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Related entity (booking, payment), if any.
    pub reference_id: Option<Uuid>,
    /// Whether the user has read it.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// When it was read.
    pub read_at: Option<DateTime<Utc>>,
}
