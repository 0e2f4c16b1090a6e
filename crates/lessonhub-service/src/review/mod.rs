//! Review creation, deletion, and instructor aggregate maintenance.

pub mod service;

pub use service::{ReviewService, ReviewSubmission};
