//! Outbound delivery channels.
//!
//! Channels are fire-and-forget collaborators: a delivery failure is the
//! caller's to log and swallow, never to propagate into booking state.

use std::time::Duration;

use async_trait::async_trait;

use lessonhub_core::config::notification::NotificationConfig;
use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;

/// A single outbound delivery channel (email, SMS).
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Channel name for logging.
    fn name(&self) -> &'static str;

    /// Deliver a message, returning the provider's delivery id.
    async fn deliver(&self, recipient: &str, subject: &str, body: &str) -> AppResult<String>;
}

/// HTTP email provider.
#[derive(Debug, Clone)]
pub struct EmailChannel {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl EmailChannel {
    /// Build the channel from notification configuration.
    pub fn new(config: &NotificationConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: config.email_endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn deliver(&self, recipient: &str, subject: &str, body: &str) -> AppResult<String> {
        let payload = serde_json::json!({
            "to": recipient,
            "subject": subject,
            "body": body,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Email delivery failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::external_service(format!(
                "Email provider returned {status}"
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Malformed provider response: {e}")))?;
        Ok(body
            .get("delivery_id")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string())
    }
}

/// HTTP SMS provider.
#[derive(Debug, Clone)]
pub struct SmsChannel {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl SmsChannel {
    /// Build the channel from notification configuration.
    pub fn new(config: &NotificationConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: config.sms_endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl NotificationChannel for SmsChannel {
    fn name(&self) -> &'static str {
        "sms"
    }

    async fn deliver(&self, recipient: &str, _subject: &str, body: &str) -> AppResult<String> {
        let payload = serde_json::json!({
            "to": recipient,
            "message": body,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("SMS delivery failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::external_service(format!(
                "SMS provider returned {status}"
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Malformed provider response: {e}")))?;
        Ok(body
            .get("delivery_id")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string())
    }
}
