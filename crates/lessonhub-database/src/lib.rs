//! # lessonhub-database
//!
//! PostgreSQL database connection management and concrete repository
//! implementations for all LessonHub entities.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::create_pool;
