//! Identifier resolution with a documented precedence order.
//!
//! Clients historically pass either a profile id or the owning account id
//! when naming an instructor or learner. Resolution happens here and only
//! here: the profile id wins, the user id is the fallback.

use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_database::repositories::instructor::InstructorRepository;
use lessonhub_database::repositories::learner::LearnerRepository;
use lessonhub_entity::instructor::InstructorProfile;
use lessonhub_entity::learner::LearnerProfile;

/// Precedence: the profile-id match wins over the user-id match.
pub fn pick_resolution<T>(by_profile_id: Option<T>, by_user_id: Option<T>) -> Option<T> {
    by_profile_id.or(by_user_id)
}

/// Resolve an instructor by profile id, falling back to owning user id.
pub async fn resolve_instructor(
    repo: &InstructorRepository,
    id: Uuid,
) -> AppResult<InstructorProfile> {
    let by_profile = repo.find_by_id(id).await?;
    let by_user = if by_profile.is_some() {
        None
    } else {
        repo.find_by_user_id(id).await?
    };

    pick_resolution(by_profile, by_user)
        .ok_or_else(|| AppError::not_found(format!("Instructor '{id}' not found")))
}

/// Resolve a learner by profile id, falling back to owning user id.
pub async fn resolve_learner(repo: &LearnerRepository, id: Uuid) -> AppResult<LearnerProfile> {
    let by_profile = repo.find_by_id(id).await?;
    let by_user = if by_profile.is_some() {
        None
    } else {
        repo.find_by_user_id(id).await?
    };

    pick_resolution(by_profile, by_user)
        .ok_or_else(|| AppError::not_found(format!("Learner '{id}' not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_id_wins() {
        assert_eq!(pick_resolution(Some("profile"), Some("user")), Some("profile"));
        assert_eq!(pick_resolution(None, Some("user")), Some("user"));
        assert_eq!(pick_resolution::<&str>(None, None), None);
    }
}
