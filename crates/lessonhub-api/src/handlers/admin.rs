//! Admin-only handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_database::repositories::booking::BookingTotals;
use lessonhub_service::analytics::InstructorSummary;
use lessonhub_service::availability::RegenerationSummary;
use lessonhub_service::context::RequestContext;
use lessonhub_service::resolve::resolve_learner;

use crate::dto::request::{AdminGrantRequest, AnalyticsQuery, CorrectOverlapsRequest};
use crate::dto::response::{ApiResponse, CorrectionResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::handlers::validate_request;
use crate::state::AppState;

fn require_admin(ctx: &RequestContext) -> Result<(), AppError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden("Administrator access required"))
    }
}

/// GET /api/admin/analytics
pub async fn platform_analytics(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<ApiResponse<BookingTotals>>> {
    let totals = state
        .analytics_service
        .platform_summary(auth.context(), query.from, query.to)
        .await?;
    Ok(Json(ApiResponse::ok(totals)))
}

/// GET /api/instructors/{id}/summary
///
/// Allowed for the instructor themself or an admin; the service enforces
/// ownership.
pub async fn instructor_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<ApiResponse<InstructorSummary>>> {
    let summary = state
        .analytics_service
        .instructor_summary(auth.context(), id, query.from, query.to)
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// POST /api/admin/bookings/correct-overlaps
pub async fn correct_overlaps(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CorrectOverlapsRequest>,
) -> ApiResult<Json<ApiResponse<CorrectionResponse>>> {
    require_admin(auth.context())?;

    let cancelled = state.booking_service.correct_overlaps(req.dry_run).await?;
    Ok(Json(ApiResponse::ok(CorrectionResponse {
        dry_run: req.dry_run,
        cancelled,
    })))
}

/// POST /api/admin/instructors/{id}/regenerate-availability
pub async fn regenerate_availability(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<RegenerationSummary>>> {
    require_admin(auth.context())?;

    let profile = state.instructor_service.get(id).await?;
    let summary = state.availability_generator.regenerate(&profile).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// POST /api/admin/credits/grant
///
/// Idempotent per adjustment reference: retrying the same grant is a
/// no-op.
pub async fn grant_credits(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AdminGrantRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    require_admin(auth.context())?;
    validate_request(&req)?;

    let learner = resolve_learner(&state.learner_repo, req.learner_id).await?;
    let reference = format!("admin_adjustment:{}", req.adjustment_ref);
    let granted = state
        .credit_service
        .admin_grant(learner.id, req.credits, &reference)
        .await?;

    let message = if granted {
        format!("Granted {} credits", req.credits)
    } else {
        "Adjustment already applied".to_string()
    };
    Ok(Json(ApiResponse::ok(MessageResponse { message })))
}
