//! Review entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A learner's review of a completed lesson. One per booking.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    /// Review identifier.
    pub id: Uuid,
    /// The reviewed booking (unique).
    pub booking_id: Uuid,
    /// Authoring learner.
    pub learner_id: Uuid,
    /// Reviewed instructor.
    pub instructor_id: Uuid,
    /// Overall rating, 1-5.
    pub rating: i16,
    /// Punctuality sub-rating.
    pub punctuality: Option<i16>,
    /// Communication sub-rating.
    pub communication: Option<i16>,
    /// Vehicle sub-rating.
    pub vehicle: Option<i16>,
    /// Teaching sub-rating.
    pub teaching: Option<i16>,
    /// Free-text comment.
    pub comment: Option<String>,
    /// When the review was written.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReview {
    /// The reviewed booking.
    pub booking_id: Uuid,
    /// Authoring learner.
    pub learner_id: Uuid,
    /// Reviewed instructor.
    pub instructor_id: Uuid,
    /// Overall rating, 1-5.
    pub rating: i16,
    /// Punctuality sub-rating.
    pub punctuality: Option<i16>,
    /// Communication sub-rating.
    pub communication: Option<i16>,
    /// Vehicle sub-rating.
    pub vehicle: Option<i16>,
    /// Teaching sub-rating.
    pub teaching: Option<i16>,
    /// Free-text comment.
    pub comment: Option<String>,
}
