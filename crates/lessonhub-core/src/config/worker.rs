//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Cron schedules for the periodic maintenance jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Datastore keep-alive ping schedule.
    #[serde(default = "default_keepalive")]
    pub keepalive_schedule: String,
    /// Daily availability horizon roll schedule.
    #[serde(default = "default_horizon_roll")]
    pub horizon_roll_schedule: String,
    /// Overlap audit (defensive backstop) schedule.
    #[serde(default = "default_overlap_audit")]
    pub overlap_audit_schedule: String,
}

fn default_true() -> bool {
    true
}

fn default_keepalive() -> String {
    "0 */5 * * * *".to_string()
}

fn default_horizon_roll() -> String {
    "0 0 1 * * *".to_string()
}

fn default_overlap_audit() -> String {
    "0 30 * * * *".to_string()
}
