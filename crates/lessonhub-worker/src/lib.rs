//! # lessonhub-worker
//!
//! Periodic maintenance jobs. There is no job queue: the platform's only
//! in-process background work is a datastore keep-alive ping plus two
//! housekeeping sweeps, so each cron firing runs its job body inline.

pub mod jobs;
pub mod scheduler;

pub use scheduler::CronScheduler;
