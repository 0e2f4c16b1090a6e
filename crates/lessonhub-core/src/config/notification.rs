//! Outbound notification delivery configuration.

use serde::{Deserialize, Serialize};

/// Settings for fire-and-forget email/SMS delivery providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Whether outbound delivery is attempted at all. In-app notification
    /// rows are always written regardless.
    #[serde(default)]
    pub enabled: bool,
    /// HTTP endpoint of the email provider.
    #[serde(default)]
    pub email_endpoint: String,
    /// HTTP endpoint of the SMS provider.
    #[serde(default)]
    pub sms_endpoint: String,
    /// API key sent to both providers.
    #[serde(default)]
    pub api_key: String,
    /// Timeout applied to delivery calls, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_request_timeout() -> u64 {
    10
}
