//! Request DTOs, validated at the boundary before reaching core logic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use lessonhub_entity::booking::BookingStatus;
use lessonhub_entity::instructor::{CalendarSettings, WeeklySchedule};
use lessonhub_entity::user::UserRole;

/// POST /api/auth/register
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address.
    #[validate(email)]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Full display name.
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub full_name: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Requested role.
    pub role: UserRole,
}

/// POST /api/auth/login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email)]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// PUT /api/instructors/me
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateInstructorRequest {
    /// New weekly opening-hours template.
    pub opening_hours: Option<WeeklySchedule>,
    /// New calendar settings.
    pub calendar_settings: Option<CalendarSettings>,
    /// New hourly rate.
    #[validate(range(min = 0.0, message = "Hourly rate cannot be negative"))]
    pub hourly_rate: Option<f64>,
    /// Vehicle description.
    pub vehicle_details: Option<String>,
    /// Serviced suburbs.
    pub service_suburbs: Option<Vec<String>>,
    /// Bio.
    pub bio: Option<String>,
}

/// GET /api/instructors/{id}/availability
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    /// Window start (defaults to today).
    pub from: Option<NaiveDate>,
    /// Window end (defaults to the advance-booking horizon).
    pub to: Option<NaiveDate>,
}

/// POST /api/bookings
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    /// Instructor profile id (or owning user id).
    pub instructor_id: Uuid,
    /// Lesson calendar date.
    pub lesson_date: NaiveDate,
    /// Lesson start time ("09:00" or "9:00 AM").
    #[validate(length(min = 1, message = "Start time is required"))]
    pub start_time: String,
    /// Duration in whole hours.
    #[validate(range(min = 1, max = 8, message = "Duration must be 1-8 hours"))]
    pub duration_hours: i32,
    /// Pickup location.
    pub pickup_location: Option<String>,
    /// Dropoff location.
    pub dropoff_location: Option<String>,
    /// External payment reference to verify when credits are short.
    pub payment_intent_id: Option<String>,
}

/// POST /api/bookings/{id}/cancel
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CancelBookingRequest {
    /// Cancellation reason.
    #[validate(length(min = 1, message = "A cancellation reason is required"))]
    pub reason: String,
}

/// GET /api/bookings (list filters)
#[derive(Debug, Clone, Deserialize)]
pub struct BookingListQuery {
    /// Restrict to this lifecycle status.
    pub status: Option<BookingStatus>,
    /// Lessons on or after this date.
    pub from: Option<NaiveDate>,
    /// Lessons on or before this date.
    pub to: Option<NaiveDate>,
    /// Page number.
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    25
}

/// POST /api/reviews
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReviewRequest {
    /// The booking being reviewed.
    pub booking_id: Uuid,
    /// Overall rating, 1-5.
    #[validate(range(min = 1, max = 5, message = "Rating must be 1-5"))]
    pub rating: i16,
    /// Punctuality sub-rating.
    #[validate(range(min = 1, max = 5))]
    pub punctuality: Option<i16>,
    /// Communication sub-rating.
    #[validate(range(min = 1, max = 5))]
    pub communication: Option<i16>,
    /// Vehicle sub-rating.
    #[validate(range(min = 1, max = 5))]
    pub vehicle: Option<i16>,
    /// Teaching sub-rating.
    #[validate(range(min = 1, max = 5))]
    pub teaching: Option<i16>,
    /// Free-text comment.
    pub comment: Option<String>,
}

/// POST /api/payments/intents
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateIntentRequest {
    /// Number of lesson credits to purchase.
    #[validate(range(min = 1, max = 50, message = "Credits must be 1-50"))]
    pub credits: i32,
}

/// PUT /api/learners/me
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLearnerRequest {
    /// Licence number.
    pub licence_number: Option<String>,
    /// Licence issuing state.
    pub licence_state: Option<String>,
    /// Learning goals.
    pub goals: Option<String>,
}

/// GET window for analytics endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsQuery {
    /// Window start.
    pub from: NaiveDate,
    /// Window end.
    pub to: NaiveDate,
}

/// POST /api/admin/credits/grant
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdminGrantRequest {
    /// Learner profile id (or owning user id).
    pub learner_id: Uuid,
    /// Credits to grant.
    #[validate(range(min = 1, max = 100))]
    pub credits: i32,
    /// Idempotency key for this adjustment.
    #[validate(length(min = 1, message = "An adjustment reference is required"))]
    pub adjustment_ref: String,
}

/// POST /api/admin/bookings/correct-overlaps
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CorrectOverlapsRequest {
    /// Report without cancelling.
    #[serde(default)]
    pub dry_run: bool,
}
