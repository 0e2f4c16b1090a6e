//! Learner self-service handlers.

use axum::Json;
use axum::extract::State;

use lessonhub_core::error::AppError;
use lessonhub_entity::credit::ProcessedPaymentIntent;
use lessonhub_entity::learner::{LearnerProfile, UpdateLearnerProfile};

use crate::dto::request::UpdateLearnerRequest;
use crate::dto::response::{ApiResponse, BalanceResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::handlers::validate_request;
use crate::state::AppState;

/// GET /api/learners/me
pub async fn get_own_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<LearnerProfile>>> {
    let profile = state
        .learner_repo
        .find_by_user_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::forbidden("A learner profile is required"))?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// PUT /api/learners/me
pub async fn update_own_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateLearnerRequest>,
) -> ApiResult<Json<ApiResponse<LearnerProfile>>> {
    validate_request(&req)?;

    let profile = state
        .learner_repo
        .find_by_user_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::forbidden("A learner profile is required"))?;

    let updated = state
        .learner_repo
        .update(
            profile.id,
            &UpdateLearnerProfile {
                licence_number: req.licence_number,
                licence_state: req.licence_state,
                goals: req.goals,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// GET /api/learners/me/credits
pub async fn get_credits(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<BalanceResponse>>> {
    let profile = state
        .learner_repo
        .find_by_user_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::forbidden("A learner profile is required"))?;

    let lesson_credits = state.credit_service.balance(profile.id).await?;
    Ok(Json(ApiResponse::ok(BalanceResponse { lesson_credits })))
}

/// GET /api/learners/me/credits/history
pub async fn get_credit_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<ProcessedPaymentIntent>>>> {
    let profile = state
        .learner_repo
        .find_by_user_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::forbidden("A learner profile is required"))?;

    let history = state.credit_service.processed_intents(profile.id).await?;
    Ok(Json(ApiResponse::ok(history)))
}
