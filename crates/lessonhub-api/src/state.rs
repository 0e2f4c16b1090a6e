//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use lessonhub_auth::jwt::JwtDecoder;
use lessonhub_core::config::AppConfig;

use lessonhub_database::repositories::learner::LearnerRepository;

use lessonhub_service::account::AccountService;
use lessonhub_service::analytics::AnalyticsService;
use lessonhub_service::availability::{AvailabilityGenerator, SlotInventory};
use lessonhub_service::booking::BookingService;
use lessonhub_service::credit::CreditService;
use lessonhub_service::instructor::InstructorService;
use lessonhub_service::notification::NotificationService;
use lessonhub_service::review::ReviewService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Repositories used directly by handlers ───────────────
    /// Learner repository
    pub learner_repo: Arc<LearnerRepository>,

    // ── Services ─────────────────────────────────────────────
    /// Account registration and login
    pub account_service: Arc<AccountService>,
    /// Instructor profile management
    pub instructor_service: Arc<InstructorService>,
    /// Availability generator
    pub availability_generator: Arc<AvailabilityGenerator>,
    /// Slot inventory reads
    pub slot_inventory: Arc<SlotInventory>,
    /// Booking lifecycle
    pub booking_service: Arc<BookingService>,
    /// Credit ledger and payment reconciliation
    pub credit_service: Arc<CreditService>,
    /// Reviews
    pub review_service: Arc<ReviewService>,
    /// Notifications
    pub notification_service: Arc<NotificationService>,
    /// Analytics
    pub analytics_service: Arc<AnalyticsService>,
}
