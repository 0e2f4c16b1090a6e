//! Webhook payload verification and parsing.
//!
//! Notifications from the processor are authenticated with an
//! HMAC-SHA256 signature over the raw request body, hex-encoded in the
//! `X-Payment-Signature` header. Verification happens before any payload
//! field is trusted.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;

use crate::processor::PaymentIntent;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex-encoded signature.
pub const SIGNATURE_HEADER: &str = "x-payment-signature";

/// Event type for a succeeded payment.
pub const EVENT_PAYMENT_SUCCEEDED: &str = "payment_intent.succeeded";
/// Event type for a failed payment.
pub const EVENT_PAYMENT_FAILED: &str = "payment_intent.payment_failed";

/// A webhook event envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event type string.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload.
    pub data: WebhookData,
}

/// Payload wrapper matching the processor's envelope shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookData {
    /// The intent the event is about.
    pub object: PaymentIntent,
}

/// Verify the shared-secret signature over a raw payload.
///
/// Comparison is constant-time (`Mac::verify_slice`).
pub fn verify_signature(payload: &[u8], signature_hex: &str, secret: &str) -> AppResult<()> {
    let signature = hex::decode(signature_hex.trim())
        .map_err(|_| AppError::unauthorized("Malformed webhook signature"))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::internal(format!("Invalid webhook secret: {e}")))?;
    mac.update(payload);
    mac.verify_slice(&signature)
        .map_err(|_| AppError::unauthorized("Webhook signature mismatch"))
}

/// Compute the hex signature for a payload. Used by tests and tooling.
pub fn sign_payload(payload: &[u8], secret: &str) -> AppResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::internal(format!("Invalid webhook secret: {e}")))?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Parse a verified payload into an event.
pub fn parse_event(payload: &[u8]) -> AppResult<WebhookEvent> {
    serde_json::from_slice(payload)
        .map_err(|e| AppError::validation(format!("Malformed webhook payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::IntentStatus;

    #[test]
    fn test_signature_round_trip() {
        let payload = br#"{"type":"payment_intent.succeeded"}"#;
        let signature = sign_payload(payload, "whsec_test").unwrap();
        assert!(verify_signature(payload, &signature, "whsec_test").is_ok());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signature = sign_payload(b"original", "whsec_test").unwrap();
        assert!(verify_signature(b"tampered", &signature, "whsec_test").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signature = sign_payload(b"payload", "whsec_one").unwrap();
        assert!(verify_signature(b"payload", &signature, "whsec_two").is_err());
    }

    #[test]
    fn test_parse_event() {
        let payload = br#"{
            "type": "payment_intent.succeeded",
            "data": {
                "object": {
                    "id": "pi_123",
                    "status": "succeeded",
                    "amount": 37500,
                    "currency": "aud",
                    "metadata": {"kind": "package_purchase", "credits": "5"}
                }
            }
        }"#;
        let event = parse_event(payload).unwrap();
        assert_eq!(event.event_type, EVENT_PAYMENT_SUCCEEDED);
        assert_eq!(event.data.object.status, IntentStatus::Succeeded);
        assert_eq!(event.data.object.credit_quantity(), Some(5));
    }
}
