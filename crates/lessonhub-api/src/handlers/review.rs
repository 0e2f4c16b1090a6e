//! Review handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use lessonhub_core::types::pagination::PageResponse;
use lessonhub_entity::review::Review;
use lessonhub_service::review::ReviewSubmission;

use crate::dto::request::CreateReviewRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams};
use crate::handlers::validate_request;
use crate::state::AppState;

/// POST /api/reviews
pub async fn create_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateReviewRequest>,
) -> ApiResult<Json<ApiResponse<Review>>> {
    validate_request(&req)?;

    let review = state
        .review_service
        .create_review(
            auth.context(),
            ReviewSubmission {
                booking_id: req.booking_id,
                rating: req.rating,
                punctuality: req.punctuality,
                communication: req.communication,
                vehicle: req.vehicle,
                teaching: req.teaching,
                comment: req.comment,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(review)))
}

/// DELETE /api/reviews/{id}
pub async fn delete_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.review_service.delete_review(auth.context(), id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Review deleted".to_string(),
    })))
}

/// GET /api/instructors/{id}/reviews
pub async fn list_instructor_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Review>>>> {
    let profile = state.instructor_service.get(id).await?;
    let reviews = state
        .review_service
        .list_for_instructor(profile.id, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(reviews)))
}
