//! Route definitions for the LessonHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The
//! router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(instructor_routes())
        .merge(booking_routes())
        .merge(payment_routes())
        .merge(learner_routes())
        .merge(review_routes())
        .merge(notification_routes())
        .merge(admin_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: register, login, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

/// Instructor profiles, availability, and reviews
fn instructor_routes() -> Router<AppState> {
    Router::new()
        .route("/instructors", get(handlers::instructor::list_instructors))
        .route(
            "/instructors/me",
            get(handlers::instructor::get_own_profile),
        )
        .route(
            "/instructors/me",
            put(handlers::instructor::update_own_profile),
        )
        .route("/instructors/{id}", get(handlers::instructor::get_instructor))
        .route(
            "/instructors/{id}/availability",
            get(handlers::availability::list_availability),
        )
        .route(
            "/instructors/{id}/reviews",
            get(handlers::review::list_instructor_reviews),
        )
        .route(
            "/instructors/{id}/summary",
            get(handlers::admin::instructor_summary),
        )
}

/// Booking lifecycle
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(handlers::booking::create_booking))
        .route("/bookings", get(handlers::booking::list_my_bookings))
        .route(
            "/bookings/instructor",
            get(handlers::booking::list_instructor_bookings),
        )
        .route("/bookings/{id}", get(handlers::booking::get_booking))
        .route(
            "/bookings/{id}/confirm",
            post(handlers::booking::confirm_booking),
        )
        .route("/bookings/{id}/start", post(handlers::booking::start_lesson))
        .route(
            "/bookings/{id}/complete",
            post(handlers::booking::complete_booking),
        )
        .route(
            "/bookings/{id}/no-show",
            post(handlers::booking::mark_no_show),
        )
        .route(
            "/bookings/{id}/cancel",
            post(handlers::booking::cancel_booking),
        )
}

/// Payment intents and the processor webhook
fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payments/intents", post(handlers::payment::create_intent))
        .route(
            "/payments/intents/{id}",
            get(handlers::payment::intent_status),
        )
        .route("/webhooks/payments", post(handlers::payment::payment_webhook))
}

/// Learner self-service
fn learner_routes() -> Router<AppState> {
    Router::new()
        .route("/learners/me", get(handlers::learner::get_own_profile))
        .route("/learners/me", put(handlers::learner::update_own_profile))
        .route("/learners/me/credits", get(handlers::learner::get_credits))
        .route(
            "/learners/me/credits/history",
            get(handlers::learner::get_credit_history),
        )
}

/// Reviews
fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", post(handlers::review::create_review))
        .route("/reviews/{id}", delete(handlers::review::delete_review))
}

/// Notifications
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
}

/// Admin-only endpoints
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/analytics",
            get(handlers::admin::platform_analytics),
        )
        .route(
            "/admin/bookings/correct-overlaps",
            post(handlers::admin::correct_overlaps),
        )
        .route(
            "/admin/instructors/{id}/regenerate-availability",
            post(handlers::admin::regenerate_availability),
        )
        .route("/admin/credits/grant", post(handlers::admin::grant_credits))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::{HeaderValue, Method};
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if cors_config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    }

    cors.max_age(std::time::Duration::from_secs(cors_config.max_age_seconds))
}
