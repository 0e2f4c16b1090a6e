//! Availability listing handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::Utc;
use uuid::Uuid;

use lessonhub_entity::availability::AvailabilityDay;

use crate::dto::request::AvailabilityQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/instructors/{id}/availability
///
/// Lists the instructor's bookable slots in a date window, clamped to
/// their advance-booking horizon and filtered by minimum notice.
pub async fn list_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Json<ApiResponse<Vec<AvailabilityDay>>>> {
    let profile = state.instructor_service.get(id).await?;
    let days = state
        .slot_inventory
        .list_for_instructor(&profile, query.from, query.to, Utc::now())
        .await?;
    Ok(Json(ApiResponse::ok(days)))
}
