//! Instructor profile handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use lessonhub_core::types::pagination::PageResponse;
use lessonhub_entity::instructor::{InstructorProfile, UpdateInstructorProfile};

use crate::dto::request::UpdateInstructorRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams};
use crate::handlers::validate_request;
use crate::state::AppState;

/// GET /api/instructors
pub async fn list_instructors(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<InstructorProfile>>>> {
    let result = state
        .instructor_service
        .list(params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/instructors/{id}
pub async fn get_instructor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<InstructorProfile>>> {
    let profile = state.instructor_service.get(id).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// GET /api/instructors/me
pub async fn get_own_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<InstructorProfile>>> {
    let profile = state.instructor_service.own_profile(auth.context()).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// PUT /api/instructors/me
///
/// A changed opening-hours template regenerates the future slot
/// inventory before this returns.
pub async fn update_own_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateInstructorRequest>,
) -> ApiResult<Json<ApiResponse<InstructorProfile>>> {
    validate_request(&req)?;

    let profile = state
        .instructor_service
        .update_own_profile(
            auth.context(),
            UpdateInstructorProfile {
                opening_hours: req.opening_hours,
                calendar_settings: req.calendar_settings,
                hourly_rate: req.hourly_rate,
                vehicle_details: req.vehicle_details,
                service_suburbs: req.service_suburbs,
                bio: req.bio,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(profile)))
}
