//! # lessonhub-service
//!
//! Business logic services for LessonHub. Services orchestrate the
//! repositories and external collaborators; all invariants of the booking
//! and availability ledger are enforced here or in the guarded updates
//! the repositories expose.

pub mod account;
pub mod analytics;
pub mod availability;
pub mod booking;
pub mod context;
pub mod credit;
pub mod instructor;
pub mod notification;
pub mod resolve;
pub mod review;

pub use context::RequestContext;
