//! Instructor profile model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::schedule::{CalendarSettings, WeeklySchedule};

/// An instructor's marketplace profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InstructorProfile {
    /// Profile identifier (distinct from the owning user id).
    pub id: Uuid,
    /// Owning user account.
    pub user_id: Uuid,
    /// Weekly opening-hours template.
    pub opening_hours: Json<WeeklySchedule>,
    /// Calendar behavior settings.
    pub calendar_settings: Json<CalendarSettings>,
    /// Base hourly rate charged per lesson hour.
    pub hourly_rate: f64,
    /// Free-text vehicle description.
    pub vehicle_details: Option<String>,
    /// Suburbs the instructor services.
    pub service_suburbs: Vec<String>,
    /// Free-text bio.
    pub bio: Option<String>,
    /// Aggregate review rating.
    pub rating: f64,
    /// Number of reviews behind the aggregate.
    pub review_count: i32,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create an instructor profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInstructorProfile {
    /// Owning user account.
    pub user_id: Uuid,
    /// Initial weekly template (may be empty).
    pub opening_hours: WeeklySchedule,
    /// Calendar settings.
    pub calendar_settings: CalendarSettings,
    /// Base hourly rate.
    pub hourly_rate: f64,
    /// Vehicle description.
    pub vehicle_details: Option<String>,
    /// Serviced suburbs.
    pub service_suburbs: Vec<String>,
    /// Bio.
    pub bio: Option<String>,
}

/// Profile fields an instructor may update. A changed `opening_hours`
/// triggers regeneration of the future slot inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInstructorProfile {
    /// New weekly template.
    pub opening_hours: Option<WeeklySchedule>,
    /// New calendar settings.
    pub calendar_settings: Option<CalendarSettings>,
    /// New hourly rate.
    pub hourly_rate: Option<f64>,
    /// New vehicle description.
    pub vehicle_details: Option<String>,
    /// New serviced suburbs.
    pub service_suburbs: Option<Vec<String>>,
    /// New bio.
    pub bio: Option<String>,
}
