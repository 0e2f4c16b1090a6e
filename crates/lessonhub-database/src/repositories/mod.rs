//! Concrete repository implementations.
//!
//! Every repository owns a clone of the connection pool and maps sqlx
//! errors into the unified [`lessonhub_core::AppError`].

pub mod availability;
pub mod booking;
pub mod instructor;
pub mod learner;
pub mod notification;
pub mod review;
pub mod user;

use lessonhub_core::error::{AppError, ErrorKind};

/// Map a sqlx error, turning unique-constraint violations into conflicts.
pub(crate) fn map_db_error(e: sqlx::Error, context: &str, conflict_message: &str) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        // 23505 = unique_violation
        if db.code().as_deref() == Some("23505") {
            return AppError::conflict(conflict_message);
        }
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), e)
}
