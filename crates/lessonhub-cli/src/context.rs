//! Shared wiring for CLI commands.

use std::sync::Arc;

use lessonhub_core::config::AppConfig;
use lessonhub_core::error::AppError;
use lessonhub_database::repositories::availability::AvailabilityRepository;
use lessonhub_database::repositories::booking::BookingRepository;
use lessonhub_database::repositories::instructor::InstructorRepository;
use lessonhub_database::repositories::learner::LearnerRepository;
use lessonhub_database::repositories::notification::NotificationRepository;
use lessonhub_database::repositories::user::UserRepository;
use lessonhub_payments::http::HttpPaymentProcessor;
use lessonhub_payments::processor::PaymentProcessor;
use lessonhub_service::availability::{AvailabilityGenerator, SlotInventory};
use lessonhub_service::booking::BookingService;
use lessonhub_service::credit::CreditService;
use lessonhub_service::notification::NotificationService;

/// Repositories and services the CLI commands run against.
pub struct CliContext {
    pub instructor_repo: Arc<InstructorRepository>,
    pub learner_repo: Arc<LearnerRepository>,
    pub generator: Arc<AvailabilityGenerator>,
    pub booking_service: Arc<BookingService>,
    pub credit_service: Arc<CreditService>,
}

impl CliContext {
    /// Connect and wire the service graph. Outbound notification
    /// channels stay empty: CLI actions still write in-app rows but never
    /// send email or SMS.
    pub async fn build(config: &AppConfig) -> Result<Self, AppError> {
        let pool = lessonhub_database::connection::create_pool(&config.database).await?;

        let user_repo = Arc::new(UserRepository::new(pool.clone()));
        let learner_repo = Arc::new(LearnerRepository::new(pool.clone()));
        let instructor_repo = Arc::new(InstructorRepository::new(pool.clone()));
        let availability_repo = Arc::new(AvailabilityRepository::new(pool.clone()));
        let booking_repo = Arc::new(BookingRepository::new(pool.clone()));
        let notification_repo = Arc::new(NotificationRepository::new(pool.clone()));

        let generator = Arc::new(AvailabilityGenerator::new(
            Arc::clone(&availability_repo),
            Arc::clone(&booking_repo),
        ));
        let inventory = Arc::new(SlotInventory::new(Arc::clone(&availability_repo)));

        let processor: Arc<dyn PaymentProcessor> =
            Arc::new(HttpPaymentProcessor::new(&config.payment)?);
        let credit_service = Arc::new(CreditService::new(
            Arc::clone(&learner_repo),
            processor,
            config.payment.clone(),
        ));

        let notifier = Arc::new(NotificationService::new(
            Arc::clone(&notification_repo),
            Arc::clone(&user_repo),
            Vec::new(),
        ));

        let booking_service = Arc::new(BookingService::new(
            Arc::clone(&booking_repo),
            Arc::clone(&learner_repo),
            Arc::clone(&instructor_repo),
            inventory,
            Arc::clone(&credit_service),
            notifier,
        ));

        Ok(Self {
            instructor_repo,
            learner_repo,
            generator,
            booking_service,
            credit_service,
        })
    }
}
