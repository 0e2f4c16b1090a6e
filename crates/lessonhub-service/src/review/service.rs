//! Review CRUD and instructor rating aggregation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_database::repositories::booking::BookingRepository;
use lessonhub_database::repositories::instructor::InstructorRepository;
use lessonhub_database::repositories::learner::LearnerRepository;
use lessonhub_database::repositories::review::ReviewRepository;
use lessonhub_entity::booking::BookingStatus;
use lessonhub_entity::review::{CreateReview, Review};

use crate::context::RequestContext;

/// A learner's review submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSubmission {
    /// The booking being reviewed.
    pub booking_id: Uuid,
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

/// Review lifecycle orchestration.
#[derive(Debug, Clone)]
pub struct ReviewService {
    review_repo: Arc<ReviewRepository>,
    booking_repo: Arc<BookingRepository>,
    instructor_repo: Arc<InstructorRepository>,
    learner_repo: Arc<LearnerRepository>,
}

impl ReviewService {
    /// Creates a new review service.
    pub fn new(
        review_repo: Arc<ReviewRepository>,
        booking_repo: Arc<BookingRepository>,
        instructor_repo: Arc<InstructorRepository>,
        learner_repo: Arc<LearnerRepository>,
    ) -> Self {
        Self {
            review_repo,
            booking_repo,
            instructor_repo,
            learner_repo,
        }
    }

    /// Create a review for a completed booking. One review per booking,
    /// and only by the booking's learner.
    pub async fn create_review(
        &self,
        ctx: &RequestContext,
        submission: ReviewSubmission,
    ) -> AppResult<Review> {
        let learner = self
            .learner_repo
            .find_by_user_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::forbidden("A learner profile is required to review"))?;

        let booking = self
            .booking_repo
            .find_by_id(submission.booking_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Booking '{}' not found", submission.booking_id))
            })?;

        if booking.learner_id != learner.id {
            return Err(AppError::forbidden(
                "You can only review your own lessons",
            ));
        }
        if booking.status != BookingStatus::Completed {
            return Err(AppError::validation(
                "Only completed lessons can be reviewed",
            ));
        }

        let review = self
            .review_repo
            .create(&CreateReview {
                booking_id: booking.id,
                learner_id: learner.id,
                instructor_id: booking.instructor_id,
                rating: submission.rating,
                punctuality: submission.punctuality,
                communication: submission.communication,
                vehicle: submission.vehicle,
                teaching: submission.teaching,
                comment: submission.comment,
            })
            .await?;

        self.recompute_aggregate(booking.instructor_id).await?;

        info!(
            review_id = %review.id,
            booking_id = %booking.id,
            rating = review.rating,
            "Review created"
        );

        Ok(review)
    }

    /// Delete a review (author or admin) and recompute the aggregate.
    pub async fn delete_review(&self, ctx: &RequestContext, review_id: Uuid) -> AppResult<()> {
        let review = self
            .review_repo
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Review '{review_id}' not found")))?;

        if !ctx.is_admin() {
            let learner = self
                .learner_repo
                .find_by_user_id(ctx.user_id)
                .await?
                .ok_or_else(|| AppError::forbidden("You can only delete your own reviews"))?;
            if review.learner_id != learner.id {
                return Err(AppError::forbidden("You can only delete your own reviews"));
            }
        }

        self.review_repo.delete(review_id).await?;
        self.recompute_aggregate(review.instructor_id).await?;

        info!(review_id = %review_id, "Review deleted");
        Ok(())
    }

    /// List an instructor's reviews.
    pub async fn list_for_instructor(
        &self,
        instructor_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PageResponse<Review>> {
        self.review_repo
            .list_for_instructor(instructor_id, &page)
            .await
    }

    async fn recompute_aggregate(&self, instructor_id: Uuid) -> AppResult<()> {
        let aggregate = self
            .review_repo
            .aggregate_for_instructor(instructor_id)
            .await?;
        self.instructor_repo
            .update_rating(
                instructor_id,
                aggregate.rating,
                aggregate.review_count as i32,
            )
            .await
    }
}
