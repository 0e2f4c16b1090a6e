//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::info;

use lessonhub_core::config::worker::WorkerConfig;
use lessonhub_core::error::AppError;
use lessonhub_database::repositories::instructor::InstructorRepository;
use lessonhub_service::availability::AvailabilityGenerator;
use lessonhub_service::booking::BookingService;

use crate::jobs;

/// Cron-based scheduler for periodic background tasks.
pub struct CronScheduler {
    scheduler: JobScheduler,
    config: WorkerConfig,
    pool: PgPool,
    instructor_repo: Arc<InstructorRepository>,
    generator: Arc<AvailabilityGenerator>,
    booking_service: Arc<BookingService>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler.
    pub async fn new(
        config: WorkerConfig,
        pool: PgPool,
        instructor_repo: Arc<InstructorRepository>,
        generator: Arc<AvailabilityGenerator>,
        booking_service: Arc<BookingService>,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            config,
            pool,
            instructor_repo,
            generator,
            booking_service,
        })
    }

    /// Register all scheduled tasks.
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_keepalive().await?;
        self.register_horizon_roll().await?;
        self.register_overlap_audit().await?;

        info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }

    /// Datastore keep-alive ping.
    async fn register_keepalive(&self) -> Result<(), AppError> {
        let pool = self.pool.clone();
        let job = CronJob::new_async(self.config.keepalive_schedule.as_str(), move |_uuid, _lock| {
            let pool = pool.clone();
            Box::pin(async move {
                jobs::keepalive::run(&pool).await;
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create keepalive schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add keepalive schedule: {e}")))?;

        info!(schedule = %self.config.keepalive_schedule, "Registered: keepalive");
        Ok(())
    }

    /// Daily availability horizon roll.
    async fn register_horizon_roll(&self) -> Result<(), AppError> {
        let instructor_repo = Arc::clone(&self.instructor_repo);
        let generator = Arc::clone(&self.generator);
        let job = CronJob::new_async(
            self.config.horizon_roll_schedule.as_str(),
            move |_uuid, _lock| {
                let instructor_repo = Arc::clone(&instructor_repo);
                let generator = Arc::clone(&generator);
                Box::pin(async move {
                    jobs::horizon::run(&instructor_repo, &generator).await;
                })
            },
        )
        .map_err(|e| AppError::internal(format!("Failed to create horizon schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add horizon schedule: {e}")))?;

        info!(schedule = %self.config.horizon_roll_schedule, "Registered: horizon_roll");
        Ok(())
    }

    /// Overlap audit backstop.
    async fn register_overlap_audit(&self) -> Result<(), AppError> {
        let booking_service = Arc::clone(&self.booking_service);
        let job = CronJob::new_async(
            self.config.overlap_audit_schedule.as_str(),
            move |_uuid, _lock| {
                let booking_service = Arc::clone(&booking_service);
                Box::pin(async move {
                    jobs::overlap_audit::run(&booking_service).await;
                })
            },
        )
        .map_err(|e| AppError::internal(format!("Failed to create audit schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add audit schedule: {e}")))?;

        info!(schedule = %self.config.overlap_audit_schedule, "Registered: overlap_audit");
        Ok(())
    }
}
