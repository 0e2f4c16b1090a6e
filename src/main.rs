//! LessonHub Server — Driving Lesson Marketplace Backend
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use lessonhub_core::config::AppConfig;
use lessonhub_core::error::AppError;
use lessonhub_payments::http::HttpPaymentProcessor;
use lessonhub_payments::processor::PaymentProcessor;
use lessonhub_service::notification::{EmailChannel, NotificationChannel, SmsChannel};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("LESSONHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting LessonHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db_pool = lessonhub_database::connection::create_pool(&config.database).await?;

    tracing::info!("Running database migrations...");
    lessonhub_database::migration::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    // ── Step 2: Initialize repositories ──────────────────────────
    let user_repo = Arc::new(lessonhub_database::repositories::user::UserRepository::new(
        db_pool.clone(),
    ));
    let learner_repo = Arc::new(
        lessonhub_database::repositories::learner::LearnerRepository::new(db_pool.clone()),
    );
    let instructor_repo = Arc::new(
        lessonhub_database::repositories::instructor::InstructorRepository::new(db_pool.clone()),
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

    // ── Step 3: Initialize auth system ───────────────────────────
    tracing::info!("Initializing authentication...");
    let password_hasher = Arc::new(lessonhub_auth::password::PasswordHasher::new());
    let jwt_encoder = Arc::new(lessonhub_auth::jwt::JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(lessonhub_auth::jwt::JwtDecoder::new(&config.auth));

    // ── Step 4: Payment processor client ─────────────────────────
    tracing::info!("Initializing payment processor client...");
    let payment_processor: Arc<dyn PaymentProcessor> =
        Arc::new(HttpPaymentProcessor::new(&config.payment)?);

    // ── Step 5: Notification channels ────────────────────────────
    let mut channels: Vec<Arc<dyn NotificationChannel>> = Vec::new();
    if config.notification.enabled {
        tracing::info!("Outbound notifications enabled");
        channels.push(Arc::new(EmailChannel::new(&config.notification)?));
        if !config.notification.sms_endpoint.is_empty() {
            channels.push(Arc::new(SmsChannel::new(&config.notification)?));
        }
    } else {
        tracing::info!("Outbound notifications disabled, in-app only");
    }

    // ── Step 6: Initialize services ──────────────────────────────
    tracing::info!("Initializing services...");
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
        Arc::clone(&payment_processor),
        config.payment.clone(),
    ));
    let notification_service = Arc::new(lessonhub_service::notification::NotificationService::new(
        Arc::clone(&notification_repo),
        Arc::clone(&user_repo),
        channels,
    ));
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
    tracing::info!("Services initialized");

    // ── Step 7: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, _shutdown_rx) = watch::channel(false);

    // ── Step 8: Start background worker ──────────────────────────
    let scheduler = if config.worker.enabled {
        tracing::info!("Starting background worker...");
        let scheduler = lessonhub_worker::CronScheduler::new(
            config.worker.clone(),
            db_pool.clone(),
            Arc::clone(&instructor_repo),
            Arc::clone(&availability_generator),
            Arc::clone(&booking_service),
        )
        .await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;
        tracing::info!("Background worker started");
        Some(scheduler)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 9: Build and start HTTP server ──────────────────────
    tracing::info!(
        "Starting HTTP server on {}:{}...",
        config.server.host,
        config.server.port
    );

    let app_state = lessonhub_api::state::AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        jwt_decoder,
        learner_repo: Arc::clone(&learner_repo),
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

    let app = lessonhub_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("LessonHub server listening on {addr}");

    // ── Step 10: Graceful shutdown ───────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(mut scheduler) = scheduler {
        let _ = scheduler.shutdown().await;
    }

    tracing::info!("LessonHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
