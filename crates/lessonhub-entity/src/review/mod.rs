//! Review entities.

pub mod model;

pub use model::{CreateReview, Review};
