//! Booking lifecycle handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_database::repositories::booking::BookingFilter;
use lessonhub_entity::booking::Booking;
use lessonhub_service::booking::BookingRequest;

use crate::dto::request::{BookingListQuery, CancelBookingRequest, CreateBookingRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::handlers::validate_request;
use crate::state::AppState;

impl BookingListQuery {
    fn into_parts(self) -> (BookingFilter, PageRequest) {
        (
            BookingFilter {
                status: self.status,
                from_date: self.from,
                to_date: self.to,
            },
            PageRequest::new(self.page, self.per_page),
        )
    }
}

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    validate_request(&req)?;

    let booking = state
        .booking_service
        .create_booking(
            auth.context(),
            BookingRequest {
                instructor_id: req.instructor_id,
                lesson_date: req.lesson_date,
                start_time: req.start_time,
                duration_hours: req.duration_hours,
                pickup_location: req.pickup_location,
                dropoff_location: req.dropoff_location,
                payment_intent_id: req.payment_intent_id,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(booking)))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state.booking_service.get_booking(auth.context(), id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// GET /api/bookings (the calling learner's bookings)
pub async fn list_my_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<BookingListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Booking>>>> {
    let (filter, page) = query.into_parts();
    let result = state
        .booking_service
        .list_for_learner(auth.context(), filter, page)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/bookings/instructor (the calling instructor's bookings)
pub async fn list_instructor_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<BookingListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Booking>>>> {
    let (filter, page) = query.into_parts();
    let result = state
        .booking_service
        .list_for_instructor(auth.context(), filter, page)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/bookings/{id}/confirm
pub async fn confirm_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state
        .booking_service
        .confirm_booking(auth.context(), id)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/start
pub async fn start_lesson(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state.booking_service.start_lesson(auth.context(), id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/complete
pub async fn complete_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state
        .booking_service
        .complete_booking(auth.context(), id)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/no-show
pub async fn mark_no_show(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state.booking_service.mark_no_show(auth.context(), id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CancelBookingRequest>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    validate_request(&req)?;
    let booking = state
        .booking_service
        .cancel_booking(auth.context(), id, &req.reason)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}
