//! Shared test helpers for integration tests.
//!
//! These tests run against a provisioned PostgreSQL instance (see
//! `config/test.toml`); the payment processor is the in-memory mock so
//! payment flows are fully scriptable.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use lessonhub_core::config::AppConfig;
use lessonhub_payments::mock::MockProcessor;
use lessonhub_payments::processor::PaymentProcessor;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Application config
    pub config: AppConfig,
    /// The scriptable payment processor
    pub processor: Arc<MockProcessor>,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let config = AppConfig::load("test").expect("Failed to load test config");

        let db_pool = lessonhub_database::connection::create_pool(&config.database)
            .await
            .expect("Failed to connect to test database");

        lessonhub_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        Self::clean_database(&db_pool).await;

        let user_repo = Arc::new(lessonhub_database::repositories::user::UserRepository::new(
            db_pool.clone(),
        ));
        let learner_repo = Arc::new(
            lessonhub_database::repositories::learner::LearnerRepository::new(db_pool.clone()),
        );
        let instructor_repo = Arc::new(
            lessonhub_database::repositories::instructor::InstructorRepository::new(
                db_pool.clone(),
            ),
        );
        let availability_repo = Arc::new(
            lessonhub_database::repositories::availability::AvailabilityRepository::new(
                db_pool.clone(),
            ),
        );
        let booking_repo = Arc::new(
            lessonhub_database::repositories::booking::BookingRepository::new(db_pool.clone()),
        );
        let review_repo = Arc::new(
            lessonhub_database::repositories::review::ReviewRepository::new(db_pool.clone()),
        );
        let notification_repo = Arc::new(
            lessonhub_database::repositories::notification::NotificationRepository::new(
                db_pool.clone(),
            ),
        );

        let password_hasher = Arc::new(lessonhub_auth::password::PasswordHasher::new());
        let jwt_encoder = Arc::new(lessonhub_auth::jwt::JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(lessonhub_auth::jwt::JwtDecoder::new(&config.auth));

        let processor = Arc::new(MockProcessor::new());
        let processor_dyn: Arc<dyn PaymentProcessor> = processor.clone();

        let availability_generator = Arc::new(
            lessonhub_service::availability::AvailabilityGenerator::new(
                Arc::clone(&availability_repo),
                Arc::clone(&booking_repo),
            ),
        );
        let slot_inventory = Arc::new(lessonhub_service::availability::SlotInventory::new(
            Arc::clone(&availability_repo),
        ));
        let credit_service = Arc::new(lessonhub_service::credit::CreditService::new(
            Arc::clone(&learner_repo),
            processor_dyn,
            config.payment.clone(),
        ));
        let notification_service = Arc::new(
            lessonhub_service::notification::NotificationService::new(
                Arc::clone(&notification_repo),
                Arc::clone(&user_repo),
                Vec::new(),
            ),
        );
        let booking_service = Arc::new(lessonhub_service::booking::BookingService::new(
            Arc::clone(&booking_repo),
            Arc::clone(&learner_repo),
            Arc::clone(&instructor_repo),
            Arc::clone(&slot_inventory),
            Arc::clone(&credit_service),
            Arc::clone(&notification_service),
        ));
        let account_service = Arc::new(lessonhub_service::account::AccountService::new(
            Arc::clone(&user_repo),
            Arc::clone(&learner_repo),
            Arc::clone(&instructor_repo),
            password_hasher,
            jwt_encoder,
            config.auth.clone(),
        ));
        let instructor_service = Arc::new(lessonhub_service::instructor::InstructorService::new(
            Arc::clone(&instructor_repo),
            Arc::clone(&availability_generator),
        ));
        let review_service = Arc::new(lessonhub_service::review::ReviewService::new(
            Arc::clone(&review_repo),
            Arc::clone(&booking_repo),
            Arc::clone(&instructor_repo),
            Arc::clone(&learner_repo),
        ));
        let analytics_service = Arc::new(lessonhub_service::analytics::AnalyticsService::new(
            Arc::clone(&booking_repo),
            Arc::clone(&instructor_repo),
        ));

        let app_state = lessonhub_api::state::AppState {
            config: Arc::new(config.clone()),
            db_pool: db_pool.clone(),
            jwt_decoder,
            learner_repo,
            account_service,
            instructor_service,
            availability_generator,
            slot_inventory,
            booking_service,
            credit_service,
            review_service,
            notification_service,
            analytics_service,
        };

        let router = lessonhub_api::router::build_router(app_state);

        Self {
            router,
            db_pool,
            config,
            processor,
        }
    }

    /// Clean all test data from the database
    async fn clean_database(pool: &PgPool) {
        let tables = [
            "notifications",
            "reviews",
            "processed_payment_intents",
            "bookings",
            "time_slots",
            "availability_days",
            "instructor_profiles",
            "learner_profiles",
            "users",
        ];

        for table in &tables {
            let query = format!("DELETE FROM {table}");
            let _ = sqlx::query(&query).execute(pool).await;
        }
    }

    /// Register a user and return their id
    pub async fn register_user(&self, email: &str, role: &str) -> Uuid {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(serde_json::json!({
                    "email": email,
                    "password": "tr0ub4dor&3-horse-battery",
                    "full_name": "Test User",
                    "role": role,
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Registration failed: {:?}",
            response.body
        );

        response.body["data"]["id"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("No user id in registration response")
    }

    /// Login and return a JWT access token
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({
                    "email": email,
                    "password": "tr0ub4dor&3-horse-battery",
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Register an instructor with a Monday 08:00-11:00 template and
    /// return (user_id, token, instructor_profile_id).
    pub async fn setup_instructor(&self, email: &str) -> (Uuid, String, Uuid) {
        let user_id = self.register_user(email, "instructor").await;
        let token = self.login(email).await;

        let response = self
            .request(
                "PUT",
                "/api/instructors/me",
                Some(serde_json::json!({
                    "opening_hours": {
                        "monday": [{"start": "08:00", "end": "11:00"}]
                    },
                    "calendar_settings": {
                        "min_notice_hours": 0,
                        "max_advance_days": 7,
                        "slot_duration_hours": 1,
                        "travel_buffer_minutes": 0
                    },
                    "hourly_rate": 80.0
                })),
                Some(&token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Profile update failed: {:?}",
            response.body
        );

        let profile_id = response.body["data"]["id"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("No profile id in update response");

        (user_id, token, profile_id)
    }

    /// Directly set a learner's credit balance
    pub async fn set_learner_credits(&self, user_id: Uuid, credits: i32) -> Uuid {
        let profile_id: Uuid = sqlx::query_scalar(
            "UPDATE learner_profiles SET lesson_credits = $1 WHERE user_id = $2 RETURNING id",
        )
        .bind(credits)
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to set learner credits");
        profile_id
    }

    /// Read a learner's credit balance directly
    pub async fn learner_credits(&self, user_id: Uuid) -> i32 {
        sqlx::query_scalar("SELECT lesson_credits FROM learner_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to read learner credits")
    }

    /// Next Monday strictly within the coming week, as an ISO date string
    pub fn next_monday() -> String {
        use chrono::{Datelike, Days, Utc, Weekday};
        let mut date = Utc::now().date_naive();
        loop {
            date = date.checked_add_days(Days::new(1)).unwrap();
            if date.weekday() == Weekday::Mon {
                return date.to_string();
            }
        }
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// POST a raw webhook payload with a valid signature
    pub async fn post_webhook(&self, payload: &[u8]) -> TestResponse {
        let signature = lessonhub_payments::webhook::sign_payload(
            payload,
            &self.config.payment.webhook_secret,
        )
        .expect("Failed to sign payload");

        let req = Request::builder()
            .method("POST")
            .uri("/api/webhooks/payments")
            .header("Content-Type", "application/json")
            .header("x-payment-signature", signature)
            .body(Body::from(payload.to_vec()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
