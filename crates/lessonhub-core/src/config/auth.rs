//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// JWT and password policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign JWTs.
    pub jwt_secret: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_minutes: u64,
    /// Refresh token lifetime in hours.
    #[serde(default = "default_refresh_ttl")]
    pub jwt_refresh_ttl_hours: u64,
    /// Minimum zxcvbn score (0-4) accepted at registration.
    #[serde(default = "default_min_password_score")]
    pub min_password_score: u8,
}

fn default_access_ttl() -> u64 {
    30
}

fn default_refresh_ttl() -> u64 {
    24
}

fn default_min_password_score() -> u8 {
    3
}
