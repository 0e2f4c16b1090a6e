//! Registration and login.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use lessonhub_auth::jwt::{JwtEncoder, TokenPair};
use lessonhub_auth::password::{PasswordHasher, check_strength};
use lessonhub_core::config::auth::AuthConfig;
use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_database::repositories::instructor::InstructorRepository;
use lessonhub_database::repositories::learner::LearnerRepository;
use lessonhub_database::repositories::user::UserRepository;
use lessonhub_entity::instructor::{CalendarSettings, CreateInstructorProfile, WeeklySchedule};
use lessonhub_entity::learner::CreateLearnerProfile;
use lessonhub_entity::user::{CreateUser, User, UserRole};

use crate::context::RequestContext;

/// A registration request, already shape-validated at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    /// Email address.
    pub email: String,
    /// Plaintext password (hashed here, never stored).
    pub password: String,
    /// Full display name.
    pub full_name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Requested role. Admin accounts are provisioned out of band.
    pub role: UserRole,
}

/// Successful login result.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    /// Token pair.
    pub tokens: TokenPair,
    /// The authenticated user.
    pub user: User,
}

/// Account lifecycle orchestration.
pub struct AccountService {
    user_repo: Arc<UserRepository>,
    learner_repo: Arc<LearnerRepository>,
    instructor_repo: Arc<InstructorRepository>,
    hasher: Arc<PasswordHasher>,
    encoder: Arc<JwtEncoder>,
    auth_config: AuthConfig,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish()
    }
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        learner_repo: Arc<LearnerRepository>,
        instructor_repo: Arc<InstructorRepository>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        auth_config: AuthConfig,
    ) -> Self {
        Self {
            user_repo,
            learner_repo,
            instructor_repo,
            hasher,
            encoder,
            auth_config,
        }
    }

    /// Register a learner or instructor account, bootstrapping the
    /// role-specific profile.
    pub async fn register(&self, registration: Registration) -> AppResult<User> {
        if registration.role == UserRole::Admin {
            return Err(AppError::validation(
                "Admin accounts cannot be self-registered",
            ));
        }

        check_strength(
            &registration.password,
            &registration.email,
            self.auth_config.min_password_score,
        )?;

        let password_hash = self.hasher.hash(&registration.password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                email: registration.email,
                password_hash,
                full_name: registration.full_name,
                phone: registration.phone,
                role: registration.role,
            })
            .await?;

        match user.role {
            UserRole::Learner => {
                self.learner_repo
                    .create(&CreateLearnerProfile {
                        user_id: user.id,
                        licence_number: None,
                        licence_state: None,
                        goals: None,
                    })
                    .await?;
            }
            UserRole::Instructor => {
                self.instructor_repo
                    .create(&CreateInstructorProfile {
                        user_id: user.id,
                        opening_hours: WeeklySchedule::default(),
                        calendar_settings: CalendarSettings::default(),
                        hourly_rate: 0.0,
                        vehicle_details: None,
                        service_suburbs: Vec::new(),
                        bio: None,
                    })
                    .await?;
            }
            UserRole::Admin => {}
        }

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Authenticate and issue a token pair.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(AppError::unauthorized("Invalid email or password"));
        }
        if !user.can_login() {
            return Err(AppError::forbidden("This account is suspended"));
        }

        let tokens = self
            .encoder
            .generate_token_pair(user.id, user.role, &user.email)?;
        self.user_repo.touch_last_login(user.id).await?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome { tokens, user })
    }

    /// The authenticated user's own account.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<User> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
