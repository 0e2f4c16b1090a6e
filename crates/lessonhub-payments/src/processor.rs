//! The payment processor contract the core calls through.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lessonhub_core::result::AppResult;

/// Metadata key marking what an intent pays for.
pub const META_KIND: &str = "kind";
/// Metadata value for a lesson-credit package purchase.
pub const KIND_PACKAGE_PURCHASE: &str = "package_purchase";
/// Metadata value for a direct booking payment.
pub const KIND_BOOKING: &str = "booking";
/// Metadata key carrying the credit quantity of a package.
pub const META_CREDITS: &str = "credits";
/// Metadata key carrying the purchasing learner's profile id.
pub const META_LEARNER_ID: &str = "learner_id";
/// Metadata key carrying the booking id for booking payments.
pub const META_BOOKING_ID: &str = "booking_id";

/// Status reported by the processor for an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    /// Payment captured.
    Succeeded,
    /// Still processing.
    Processing,
    /// Awaiting a payment method.
    RequiresPaymentMethod,
    /// The payment failed.
    Failed,
    /// Anything the processor adds later.
    #[serde(other)]
    Unknown,
}

/// A payment intent as reported by the processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Processor-side intent identifier.
    pub id: String,
    /// Current status.
    pub status: IntentStatus,
    /// Amount in minor currency units.
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
    /// Free-form metadata attached at creation.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl PaymentIntent {
    /// Whether this intent is tagged as a package purchase.
    pub fn is_package_purchase(&self) -> bool {
        self.metadata.get(META_KIND).map(String::as_str) == Some(KIND_PACKAGE_PURCHASE)
    }

    /// Credit quantity declared in the metadata, if any.
    pub fn credit_quantity(&self) -> Option<i32> {
        self.metadata.get(META_CREDITS)?.parse().ok()
    }

    /// Purchasing learner profile id, if tagged.
    pub fn learner_id(&self) -> Option<Uuid> {
        self.metadata.get(META_LEARNER_ID)?.parse().ok()
    }

    /// Booking id, for booking payments.
    pub fn booking_id(&self) -> Option<Uuid> {
        self.metadata.get(META_BOOKING_ID)?.parse().ok()
    }
}

/// Handle returned when an intent is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentHandle {
    /// Processor-side intent identifier.
    pub id: String,
    /// Client secret the frontend uses to complete payment.
    pub client_secret: String,
}

/// Outbound contract to the payment processor.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a payment intent.
    async fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        metadata: HashMap<String, String>,
    ) -> AppResult<IntentHandle>;

    /// Retrieve an intent's current status and metadata.
    async fn retrieve_intent(&self, intent_id: &str) -> AppResult<PaymentIntent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent_with(entries: &[(&str, &str)]) -> PaymentIntent {
        PaymentIntent {
            id: "pi_1".to_string(),
            status: IntentStatus::Succeeded,
            amount: 37500,
            currency: "aud".to_string(),
            metadata: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_package_metadata() {
        let intent = intent_with(&[(META_KIND, KIND_PACKAGE_PURCHASE), (META_CREDITS, "5")]);
        assert!(intent.is_package_purchase());
        assert_eq!(intent.credit_quantity(), Some(5));
    }

    #[test]
    fn test_booking_metadata_is_not_package() {
        let intent = intent_with(&[(META_KIND, KIND_BOOKING)]);
        assert!(!intent.is_package_purchase());
        assert_eq!(intent.credit_quantity(), None);
    }

    #[test]
    fn test_unknown_status_deserializes() {
        let intent: PaymentIntent = serde_json::from_str(
            r#"{"id":"pi_2","status":"requires_capture","amount":100,"currency":"aud"}"#,
        )
        .unwrap();
        assert_eq!(intent.status, IntentStatus::Unknown);
    }
}
