//! Job bodies invoked by the cron scheduler.

pub mod horizon;
pub mod keepalive;
pub mod overlap_audit;
