//! Payment processor configuration.

use serde::{Deserialize, Serialize};

/// Settings for the external payment processor integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Base URL of the processor's REST API.
    pub api_base: String,
    /// Secret API key for outbound calls.
    #[serde(default)]
    pub secret_key: String,
    /// Shared secret used to verify webhook signatures.
    #[serde(default)]
    pub webhook_secret: String,
    /// ISO currency code used for all intents.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Timeout applied to outbound processor calls, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Price of a single lesson credit in a package purchase.
    #[serde(default = "default_package_price")]
    pub credits_package_price: f64,
}

fn default_currency() -> String {
    "aud".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_package_price() -> f64 {
    75.0
}
