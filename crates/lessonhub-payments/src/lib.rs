//! # lessonhub-payments
//!
//! Integration with the external payment processor: the
//! [`processor::PaymentProcessor`] trait, its HTTP implementation, an
//! in-memory mock for tests, and webhook payload verification.

pub mod http;
pub mod mock;
pub mod processor;
pub mod webhook;

pub use processor::{IntentHandle, IntentStatus, PaymentIntent, PaymentProcessor};
