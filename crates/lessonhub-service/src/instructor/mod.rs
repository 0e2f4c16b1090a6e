//! Instructor profile management.

pub mod service;

pub use service::InstructorService;
