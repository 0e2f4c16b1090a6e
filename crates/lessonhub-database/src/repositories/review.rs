//! Review repository implementation.

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use lessonhub_core::error::{AppError, ErrorKind};
use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_entity::review::{CreateReview, Review};

/// Aggregate rating row for an instructor.
#[derive(Debug, Clone, FromRow)]
pub struct RatingAggregate {
    /// Mean overall rating (0 when no reviews).
    pub rating: f64,
    /// Number of reviews.
    pub review_count: i64,
}

/// Repository for review CRUD operations.
#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    /// Create a new review repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new review. The unique booking constraint rejects a
    /// second review for the same booking.
    pub async fn create(&self, review: &CreateReview) -> AppResult<Review> {
        sqlx::query_as::<_, Review>(
            "INSERT INTO reviews \
                (booking_id, learner_id, instructor_id, rating, punctuality, communication, \
                 vehicle, teaching, comment) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(review.booking_id)
        .bind(review.learner_id)
        .bind(review.instructor_id)
        .bind(review.rating)
        .bind(review.punctuality)
        .bind(review.communication)
        .bind(review.vehicle)
        .bind(review.teaching)
        .bind(&review.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            super::map_db_error(
                e,
                "Failed to create review",
                "A review already exists for this booking",
            )
        })
    }

    /// Find a review by id.
    pub async fn find_by_id(&self, review_id: Uuid) -> AppResult<Option<Review>> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find review", e))
    }

    /// Delete a review.
    pub async fn delete(&self, review_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete review", e))?;
        Ok(())
    }

    /// List reviews for an instructor, newest first.
    pub async fn list_for_instructor(
        &self,
        instructor_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Review>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE instructor_id = $1")
                .bind(instructor_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count reviews", e)
                })?;

        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE instructor_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(instructor_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list reviews", e))?;

        Ok(PageResponse::new(
            reviews,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Recompute the aggregate rating for an instructor.
    pub async fn aggregate_for_instructor(&self, instructor_id: Uuid) -> AppResult<RatingAggregate> {
        sqlx::query_as::<_, RatingAggregate>(
            "SELECT COALESCE(AVG(rating), 0)::DOUBLE PRECISION AS rating, \
                    COUNT(*) AS review_count \
             FROM reviews WHERE instructor_id = $1",
        )
        .bind(instructor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to aggregate reviews", e)
        })
    }
}
