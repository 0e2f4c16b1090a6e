//! In-memory mock processor for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;

use crate::processor::{IntentHandle, IntentStatus, PaymentIntent, PaymentProcessor};

/// Programmable in-memory processor. Tests seed intents with
/// [`MockProcessor::insert_intent`] and the rest of the stack talks to it
/// through the normal trait.
#[derive(Debug, Default)]
pub struct MockProcessor {
    intents: Mutex<HashMap<String, PaymentIntent>>,
}

impl MockProcessor {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an intent the mock will report on retrieval.
    pub fn insert_intent(&self, intent: PaymentIntent) {
        self.intents
            .lock()
            .expect("mock intents lock poisoned")
            .insert(intent.id.clone(), intent);
    }

    /// Seed a succeeded package-purchase intent and return its id.
    pub fn seed_package_purchase(&self, learner_id: Uuid, credits: i32, amount: i64) -> String {
        let id = format!("pi_mock_{}", Uuid::new_v4().simple());
        let metadata = HashMap::from([
            (
                crate::processor::META_KIND.to_string(),
                crate::processor::KIND_PACKAGE_PURCHASE.to_string(),
            ),
            (
                crate::processor::META_CREDITS.to_string(),
                credits.to_string(),
            ),
            (
                crate::processor::META_LEARNER_ID.to_string(),
                learner_id.to_string(),
            ),
        ]);
        self.insert_intent(PaymentIntent {
            id: id.clone(),
            status: IntentStatus::Succeeded,
            amount,
            currency: "aud".to_string(),
            metadata,
        });
        id
    }
}

#[async_trait]
impl PaymentProcessor for MockProcessor {
    async fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        metadata: HashMap<String, String>,
    ) -> AppResult<IntentHandle> {
        let id = format!("pi_mock_{}", Uuid::new_v4().simple());
        let intent = PaymentIntent {
            id: id.clone(),
            status: IntentStatus::RequiresPaymentMethod,
            amount: amount_cents,
            currency: currency.to_string(),
            metadata,
        };
        self.intents
            .lock()
            .expect("mock intents lock poisoned")
            .insert(id.clone(), intent);
        Ok(IntentHandle {
            client_secret: format!("{id}_secret"),
            id,
        })
    }

    async fn retrieve_intent(&self, intent_id: &str) -> AppResult<PaymentIntent> {
        self.intents
            .lock()
            .expect("mock intents lock poisoned")
            .get(intent_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Payment intent '{intent_id}' not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_retrieve() {
        let mock = MockProcessor::new();
        let handle = mock
            .create_intent(9600, "aud", HashMap::new())
            .await
            .unwrap();
        let intent = mock.retrieve_intent(&handle.id).await.unwrap();
        assert_eq!(intent.amount, 9600);
        assert_eq!(intent.status, IntentStatus::RequiresPaymentMethod);
    }

    #[tokio::test]
    async fn test_missing_intent_is_not_found() {
        let mock = MockProcessor::new();
        assert!(mock.retrieve_intent("pi_nope").await.is_err());
    }
}
