//! Daily availability horizon roll.
//!
//! Regenerates every instructor's slot inventory so the bookable window
//! always extends the full advance-booking horizon from today.

use std::sync::Arc;

use tracing::{info, warn};

use lessonhub_database::repositories::instructor::InstructorRepository;
use lessonhub_service::availability::AvailabilityGenerator;

/// Regenerate availability for every instructor.
pub async fn run(
    instructor_repo: &Arc<InstructorRepository>,
    generator: &Arc<AvailabilityGenerator>,
) {
    let ids = match instructor_repo.list_all_ids().await {
        Ok(ids) => ids,
        Err(e) => {
            warn!(error = %e, "Horizon roll could not list instructors");
            return;
        }
    };

    let mut rolled = 0usize;
    for id in ids {
        let profile = match instructor_repo.find_by_id(id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => continue,
            Err(e) => {
                warn!(instructor_id = %id, error = %e, "Horizon roll could not load profile");
                continue;
            }
        };

        if let Err(e) = generator.regenerate(&profile).await {
            warn!(instructor_id = %id, error = %e, "Horizon roll regeneration failed");
        } else {
            rolled += 1;
        }
    }

    info!(instructors = rolled, "Availability horizon rolled");
}
