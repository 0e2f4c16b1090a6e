//! Instructor profile reads and updates.
//!
//! An opening-hours or calendar-settings change regenerates the future
//! slot inventory before the update returns, so a listing taken after the
//! update always reflects the new template.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_database::repositories::instructor::InstructorRepository;
use lessonhub_entity::instructor::{InstructorProfile, UpdateInstructorProfile};

use crate::availability::AvailabilityGenerator;
use crate::context::RequestContext;
use crate::resolve::resolve_instructor;

/// Instructor profile orchestration.
pub struct InstructorService {
    instructor_repo: Arc<InstructorRepository>,
    generator: Arc<AvailabilityGenerator>,
}

impl std::fmt::Debug for InstructorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstructorService").finish()
    }
}

impl InstructorService {
    /// Creates a new instructor service.
    pub fn new(
        instructor_repo: Arc<InstructorRepository>,
        generator: Arc<AvailabilityGenerator>,
    ) -> Self {
        Self {
            instructor_repo,
            generator,
        }
    }

    /// Public instructor listing.
    pub async fn list(&self, page: PageRequest) -> AppResult<PageResponse<InstructorProfile>> {
        self.instructor_repo.list(&page).await
    }

    /// Resolve one instructor (profile id or user id).
    pub async fn get(&self, id: Uuid) -> AppResult<InstructorProfile> {
        resolve_instructor(&self.instructor_repo, id).await
    }

    /// The calling instructor's own profile.
    pub async fn own_profile(&self, ctx: &RequestContext) -> AppResult<InstructorProfile> {
        self.instructor_repo
            .find_by_user_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::forbidden("An instructor profile is required"))
    }

    /// Update the calling instructor's profile. Schedule-affecting changes
    /// trigger regeneration of the future slot inventory.
    pub async fn update_own_profile(
        &self,
        ctx: &RequestContext,
        update: UpdateInstructorProfile,
    ) -> AppResult<InstructorProfile> {
        let profile = self.own_profile(ctx).await?;

        let schedule_changed =
            update.opening_hours.is_some() || update.calendar_settings.is_some();

        let updated = self.instructor_repo.update(profile.id, &update).await?;

        if schedule_changed {
            let summary = self.generator.regenerate(&updated).await?;
            info!(
                instructor_id = %updated.id,
                days = summary.days_generated,
                reapplied = summary.reservations_reapplied,
                "Slot inventory regenerated after schedule change"
            );
        }

        Ok(updated)
    }
}
