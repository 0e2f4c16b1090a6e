//! Payment intent handlers and the processor webhook endpoint.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use tracing::debug;

use lessonhub_core::error::AppError;
use lessonhub_payments::processor::{IntentHandle, PaymentIntent};
use lessonhub_payments::webhook::{
    EVENT_PAYMENT_FAILED, EVENT_PAYMENT_SUCCEEDED, SIGNATURE_HEADER, parse_event, verify_signature,
};

use crate::dto::request::CreateIntentRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::handlers::validate_request;
use crate::state::AppState;

/// POST /api/payments/intents — create a package-purchase intent.
pub async fn create_intent(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateIntentRequest>,
) -> ApiResult<Json<ApiResponse<IntentHandle>>> {
    validate_request(&req)?;

    let learner = state
        .learner_repo
        .find_by_user_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::forbidden("A learner profile is required to buy credits"))?;

    let handle = state
        .credit_service
        .create_package_intent(&learner, req.credits)
        .await?;

    Ok(Json(ApiResponse::ok(handle)))
}

/// GET /api/payments/intents/{id} — intent status, reconciling a
/// succeeded package purchase opportunistically.
pub async fn intent_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<PaymentIntent>>> {
    let learner = state
        .learner_repo
        .find_by_user_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::forbidden("A learner profile is required"))?;

    let intent = state.credit_service.intent_status(&learner, &id).await?;
    Ok(Json(ApiResponse::ok(intent)))
}

/// POST /api/webhooks/payments — processor notifications.
///
/// The signature is verified over the raw body before anything in the
/// payload is trusted. Success events grant package credits through the
/// idempotency guard; failure events cancel the referenced booking
/// without touching the credit ledger.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<serde_json::Value>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing webhook signature"))?;

    verify_signature(&body, signature, &state.config.payment.webhook_secret)?;
    let event = parse_event(&body)?;
    let intent = &event.data.object;

    match event.event_type.as_str() {
        EVENT_PAYMENT_SUCCEEDED => {
            let granted = state.credit_service.apply_succeeded_intent(intent).await?;
            if granted {
                if let (Some(learner_id), Some(credits)) =
                    (intent.learner_id(), intent.credit_quantity())
                {
                    if let Ok(Some(learner)) = state.learner_repo.find_by_id(learner_id).await {
                        state
                            .notification_service
                            .credits_granted(learner.user_id, credits)
                            .await;
                    }
                }
            }
        }
        EVENT_PAYMENT_FAILED => {
            if let Some(booking_id) = intent.booking_id() {
                state
                    .booking_service
                    .payment_failed(booking_id, &intent.id)
                    .await?;
            } else {
                debug!(intent_id = %intent.id, "Payment failure without booking reference");
            }
        }
        other => {
            debug!(event_type = other, "Ignoring unhandled webhook event");
        }
    }

    Ok(Json(serde_json::json!({ "received": true })))
}
