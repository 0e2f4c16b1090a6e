//! Credit ledger and payment reconciliation.

pub mod service;

pub use service::{CreditService, Settlement};
