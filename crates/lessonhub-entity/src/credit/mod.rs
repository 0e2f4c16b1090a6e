//! Credit ledger entities.

pub mod model;

pub use model::ProcessedPaymentIntent;
