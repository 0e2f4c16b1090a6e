//! Account registration, login, and self-service.

pub mod service;

pub use service::{AccountService, LoginOutcome, Registration};
