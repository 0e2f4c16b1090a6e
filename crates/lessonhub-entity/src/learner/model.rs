//! Learner profile model, including the embedded credit balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A learner's profile. Carries the prepaid lesson-credit balance.
///
/// The balance is only ever mutated through guarded updates in the
/// repository layer, so it can never go negative.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LearnerProfile {
    /// Profile identifier (distinct from the owning user id).
    pub id: Uuid,
    /// Owning user account.
    pub user_id: Uuid,
    /// Prepaid lesson-hour credit balance.
    pub lesson_credits: i32,
    /// Learner licence number.
    pub licence_number: Option<String>,
    /// Licence issuing state.
    pub licence_state: Option<String>,
    /// Free-text learning goals.
    pub goals: Option<String>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a learner profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLearnerProfile {
    /// Owning user account.
    pub user_id: Uuid,
    /// Licence number.
    pub licence_number: Option<String>,
    /// Licence issuing state.
    pub licence_state: Option<String>,
    /// Learning goals.
    pub goals: Option<String>,
}

/// Profile fields a learner may update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLearnerProfile {
    /// New licence number.
    pub licence_number: Option<String>,
    /// New licence state.
    pub licence_state: Option<String>,
    /// New goals.
    pub goals: Option<String>,
}
