//! Earnings and booking aggregates for dashboards.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_database::repositories::booking::{BookingRepository, BookingTotals};
use lessonhub_database::repositories::instructor::InstructorRepository;

use crate::context::RequestContext;
use crate::resolve::resolve_instructor;

/// Per-instructor dashboard summary.
#[derive(Debug, Clone, Serialize)]
pub struct InstructorSummary {
    /// Completed-booking totals in the window.
    pub totals: BookingTotals,
    /// Current aggregate rating.
    pub rating: f64,
    /// Number of reviews behind the aggregate.
    pub review_count: i32,
}

/// Aggregation over the bookings ledger.
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    booking_repo: Arc<BookingRepository>,
    instructor_repo: Arc<InstructorRepository>,
}

impl AnalyticsService {
    /// Creates a new analytics service.
    pub fn new(
        booking_repo: Arc<BookingRepository>,
        instructor_repo: Arc<InstructorRepository>,
    ) -> Self {
        Self {
            booking_repo,
            instructor_repo,
        }
    }

    /// Earnings summary for an instructor across a date window. Allowed
    /// for the instructor themself or an admin.
    pub async fn instructor_summary(
        &self,
        ctx: &RequestContext,
        instructor_id: Uuid,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> AppResult<InstructorSummary> {
        let profile = resolve_instructor(&self.instructor_repo, instructor_id).await?;

        if !ctx.is_admin() && profile.user_id != ctx.user_id {
            return Err(AppError::forbidden(
                "You can only view your own earnings summary",
            ));
        }

        let totals = self
            .booking_repo
            .totals_for_instructor(profile.id, from_date, to_date)
            .await?;

        Ok(InstructorSummary {
            totals,
            rating: profile.rating,
            review_count: profile.review_count,
        })
    }

    /// Platform-wide totals across a date window. Admin only.
    pub async fn platform_summary(
        &self,
        ctx: &RequestContext,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> AppResult<BookingTotals> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden("Administrator access required"));
        }
        self.booking_repo.platform_totals(from_date, to_date).await
    }
}
