//! User account status.

use serde::{Deserialize, Serialize};

/// Account status of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Normal account, allowed to log in and act.
    Active,
    /// Suspended by an administrator.
    Suspended,
}

impl UserStatus {
    /// Whether a user with this status may authenticate.
    pub fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }
}
