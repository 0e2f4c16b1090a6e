//! Instructor profile repository implementation.

use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use lessonhub_core::error::{AppError, ErrorKind};
use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_entity::instructor::{
    CreateInstructorProfile, InstructorProfile, UpdateInstructorProfile,
};

/// Repository for instructor profile CRUD operations.
#[derive(Debug, Clone)]
pub struct InstructorRepository {
    pool: PgPool,
}

impl InstructorRepository {
    /// Create a new instructor repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new instructor profile.
    pub async fn create(&self, profile: &CreateInstructorProfile) -> AppResult<InstructorProfile> {
        sqlx::query_as::<_, InstructorProfile>(
            "INSERT INTO instructor_profiles \
                (user_id, opening_hours, calendar_settings, hourly_rate, vehicle_details, \
                 service_suburbs, bio) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(profile.user_id)
        .bind(Json(&profile.opening_hours))
        .bind(Json(&profile.calendar_settings))
        .bind(profile.hourly_rate)
        .bind(&profile.vehicle_details)
        .bind(&profile.service_suburbs)
        .bind(&profile.bio)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            super::map_db_error(
                e,
                "Failed to create instructor profile",
                "Instructor profile already exists for this user",
            )
        })
    }

    /// Find a profile by its own id.
    pub async fn find_by_id(&self, profile_id: Uuid) -> AppResult<Option<InstructorProfile>> {
        sqlx::query_as::<_, InstructorProfile>("SELECT * FROM instructor_profiles WHERE id = $1")
            .bind(profile_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find instructor profile", e)
            })
    }

    /// Find a profile by its owning user id.
    pub async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<InstructorProfile>> {
        sqlx::query_as::<_, InstructorProfile>(
            "SELECT * FROM instructor_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to find instructor profile by user",
                e,
            )
        })
    }

    /// List instructor profiles, newest first.
    pub async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<InstructorProfile>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM instructor_profiles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count instructors", e)
            })?;

        let profiles = sqlx::query_as::<_, InstructorProfile>(
            "SELECT * FROM instructor_profiles ORDER BY rating DESC, created_at DESC \
             LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list instructors", e))?;

        Ok(PageResponse::new(
            profiles,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List all profile ids (for the availability horizon roll).
    pub async fn list_all_ids(&self) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM instructor_profiles")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list instructor ids", e)
            })
    }

    /// Update mutable profile fields.
    pub async fn update(
        &self,
        profile_id: Uuid,
        update: &UpdateInstructorProfile,
    ) -> AppResult<InstructorProfile> {
        sqlx::query_as::<_, InstructorProfile>(
            "UPDATE instructor_profiles SET \
                opening_hours = COALESCE($1, opening_hours), \
                calendar_settings = COALESCE($2, calendar_settings), \
                hourly_rate = COALESCE($3, hourly_rate), \
                vehicle_details = COALESCE($4, vehicle_details), \
                service_suburbs = COALESCE($5, service_suburbs), \
                bio = COALESCE($6, bio), \
                updated_at = NOW() \
             WHERE id = $7 RETURNING *",
        )
        .bind(update.opening_hours.as_ref().map(Json))
        .bind(update.calendar_settings.as_ref().map(Json))
        .bind(update.hourly_rate)
        .bind(&update.vehicle_details)
        .bind(&update.service_suburbs)
        .bind(&update.bio)
        .bind(profile_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update instructor profile", e)
        })
    }

    /// Overwrite the aggregate rating after a review change.
    pub async fn update_rating(
        &self,
        profile_id: Uuid,
        rating: f64,
        review_count: i32,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE instructor_profiles SET rating = $1, review_count = $2, updated_at = NOW() \
             WHERE id = $3",
        )
        .bind(rating)
        .bind(review_count)
        .bind(profile_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update instructor rating", e)
        })?;
        Ok(())
    }
}
