//! Processed payment reference records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A payment reference already applied to a learner's credit ledger.
///
/// The unique constraint on `payment_intent_id` is the sole deduplication
/// mechanism: a reference grants credit exactly once no matter how many
/// paths observe it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProcessedPaymentIntent {
    /// Record identifier.
    pub id: Uuid,
    /// Learner whose ledger was credited.
    pub learner_id: Uuid,
    /// External payment intent identifier.
    pub payment_intent_id: String,
    /// Credits granted by this reference.
    pub credits_granted: i32,
    /// When the grant was applied.
    pub processed_at: DateTime<Utc>,
}
