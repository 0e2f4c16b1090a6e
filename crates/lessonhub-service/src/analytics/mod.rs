//! Basic booking/earnings analytics.

pub mod service;

pub use service::{AnalyticsService, InstructorSummary};
