//! HTTP implementation of the payment processor contract.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use lessonhub_core::config::payment::PaymentConfig;
use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;

use crate::processor::{IntentHandle, PaymentIntent, PaymentProcessor};

/// Talks to the processor's REST API with a bounded request timeout.
///
/// The timeout matters: a hung verification call degrades to "could not
/// verify funds" upstream, it never hangs a booking request.
#[derive(Debug, Clone)]
pub struct HttpPaymentProcessor {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl HttpPaymentProcessor {
    /// Build a client from payment configuration.
    pub fn new(config: &PaymentConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }
}

#[async_trait]
impl PaymentProcessor for HttpPaymentProcessor {
    async fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        metadata: HashMap<String, String>,
    ) -> AppResult<IntentHandle> {
        let url = format!("{}/payment_intents", self.api_base);
        let body = serde_json::json!({
            "amount": amount_cents,
            "currency": currency,
            "metadata": metadata,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Payment intent creation failed");
                AppError::external_service(format!("Payment processor unreachable: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::external_service(format!(
                "Payment processor returned {status} creating intent"
            )));
        }

        response.json::<IntentHandle>().await.map_err(|e| {
            AppError::external_service(format!("Malformed intent creation response: {e}"))
        })
    }

    async fn retrieve_intent(&self, intent_id: &str) -> AppResult<PaymentIntent> {
        let url = format!("{}/payment_intents/{intent_id}", self.api_base);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, intent_id, "Payment intent retrieval failed");
                AppError::external_service(format!("Payment processor unreachable: {e}"))
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::not_found(format!(
                "Payment intent '{intent_id}' not found"
            )));
        }
        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::external_service(format!(
                "Payment processor returned {status} retrieving intent"
            )));
        }

        response.json::<PaymentIntent>().await.map_err(|e| {
            AppError::external_service(format!("Malformed intent retrieval response: {e}"))
        })
    }
}
