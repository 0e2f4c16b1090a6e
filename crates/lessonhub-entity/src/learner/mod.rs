//! Learner profile entities.

pub mod model;

pub use model::{CreateLearnerProfile, LearnerProfile, UpdateLearnerProfile};
