//! HTTP handlers, organized by domain.

pub mod admin;
pub mod auth;
pub mod availability;
pub mod booking;
pub mod health;
pub mod instructor;
pub mod learner;
pub mod notification;
pub mod payment;
pub mod review;

use lessonhub_core::error::AppError;
use validator::Validate;

use crate::error::ApiError;

/// Run boundary validation on a request DTO.
pub(crate) fn validate_request<T: Validate>(request: &T) -> Result<(), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError(AppError::validation(e.to_string())))
}
