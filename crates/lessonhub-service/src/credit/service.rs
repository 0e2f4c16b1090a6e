//! Credit ledger settlement and payment reconciliation.
//!
//! Two paths race to grant credits for the same external payment: the
//! synchronous booking-time verification and the asynchronous
//! payment-succeeded webhook. Both funnel through
//! `LearnerRepository::grant_credits_if_unprocessed`, whose unique
//! reference insert makes the grant exactly-once; whichever path observes
//! the payment first wins and the other is a no-op.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use lessonhub_core::config::payment::PaymentConfig;
use lessonhub_core::error::{AppError, ErrorKind};
use lessonhub_core::result::AppResult;
use lessonhub_database::repositories::learner::LearnerRepository;
use lessonhub_entity::booking::{PaymentMethod, PaymentStatus};
use lessonhub_entity::credit::ProcessedPaymentIntent;
use lessonhub_entity::learner::LearnerProfile;
use lessonhub_payments::processor::{
    IntentHandle, IntentStatus, KIND_PACKAGE_PURCHASE, META_CREDITS, META_KIND, META_LEARNER_ID,
    PaymentIntent, PaymentProcessor,
};

/// How a booking's funds were captured.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// Payment state recorded on the booking.
    pub payment_status: PaymentStatus,
    /// Method recorded on the booking.
    pub payment_method: PaymentMethod,
    /// External reference, when a card payment backed the settlement.
    pub payment_reference: Option<String>,
}

/// Credit ledger operations and processor reconciliation.
pub struct CreditService {
    learner_repo: Arc<LearnerRepository>,
    processor: Arc<dyn PaymentProcessor>,
    config: PaymentConfig,
}

impl std::fmt::Debug for CreditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreditService").finish()
    }
}

impl CreditService {
    /// Creates a new credit service.
    pub fn new(
        learner_repo: Arc<LearnerRepository>,
        processor: Arc<dyn PaymentProcessor>,
        config: PaymentConfig,
    ) -> Self {
        Self {
            learner_repo,
            processor,
            config,
        }
    }

    /// Current balance for a learner profile.
    pub async fn balance(&self, learner_id: Uuid) -> AppResult<i32> {
        self.learner_repo.credit_balance(learner_id).await
    }

    /// Processed payment references for a learner profile.
    pub async fn processed_intents(
        &self,
        learner_id: Uuid,
    ) -> AppResult<Vec<ProcessedPaymentIntent>> {
        self.learner_repo.list_processed_intents(learner_id).await
    }

    /// Settle the credits for a booking at creation time.
    ///
    /// Debits `required` credits if the balance covers them. Otherwise, if
    /// the request carries a payment reference, verifies it with the
    /// processor, applies the grant idempotently, and re-checks. A
    /// processor failure or timeout counts as "could not verify funds" and
    /// falls through to the insufficient-credits rejection — no partial
    /// or unpaid bookings are created.
    pub async fn settle_for_booking(
        &self,
        learner: &LearnerProfile,
        required: i32,
        payment_intent_id: Option<&str>,
    ) -> AppResult<Settlement> {
        if self
            .learner_repo
            .try_debit_credits(learner.id, required)
            .await?
        {
            return Ok(Settlement {
                payment_status: PaymentStatus::Paid,
                payment_method: PaymentMethod::Credits,
                payment_reference: None,
            });
        }

        if let Some(intent_id) = payment_intent_id {
            match self.verify_and_grant(learner.id, intent_id).await {
                Ok(_) => {}
                Err(e) if e.kind == ErrorKind::ExternalService => {
                    warn!(
                        intent_id,
                        error = %e,
                        "Could not verify payment with processor, treating as unfunded"
                    );
                }
                Err(e) => return Err(e),
            }

            if self
                .learner_repo
                .try_debit_credits(learner.id, required)
                .await?
            {
                return Ok(Settlement {
                    payment_status: PaymentStatus::Paid,
                    payment_method: PaymentMethod::Card,
                    payment_reference: Some(intent_id.to_string()),
                });
            }
        }

        let available = self.learner_repo.credit_balance(learner.id).await?;
        Err(AppError::insufficient_credits(required, available))
    }

    /// Verify an intent with the processor and grant its credits
    /// exactly once. Returns `true` if this call performed the grant.
    pub async fn verify_and_grant(&self, learner_id: Uuid, intent_id: &str) -> AppResult<bool> {
        let intent = self.processor.retrieve_intent(intent_id).await?;

        if intent.status != IntentStatus::Succeeded {
            return Err(AppError::validation(format!(
                "Payment '{intent_id}' has not succeeded"
            )));
        }
        if !intent.is_package_purchase() {
            return Err(AppError::validation(format!(
                "Payment '{intent_id}' is not a credit package purchase"
            )));
        }
        let Some(credits) = intent.credit_quantity() else {
            return Err(AppError::validation(format!(
                "Payment '{intent_id}' does not declare a credit quantity"
            )));
        };

        let granted = self
            .learner_repo
            .grant_credits_if_unprocessed(learner_id, intent_id, credits)
            .await?;

        if granted {
            info!(%learner_id, intent_id, credits, "Credits granted from verified payment");
        } else {
            info!(%learner_id, intent_id, "Payment reference already processed, no-op");
        }

        Ok(granted)
    }

    /// Apply a verified payment-succeeded notification for a package
    /// purchase. The webhook-side half of the reconciliation race.
    pub async fn apply_succeeded_intent(&self, intent: &PaymentIntent) -> AppResult<bool> {
        if intent.status != IntentStatus::Succeeded || !intent.is_package_purchase() {
            return Ok(false);
        }
        let Some(learner_id) = intent.learner_id() else {
            warn!(intent_id = %intent.id, "Package purchase without learner metadata, skipping");
            return Ok(false);
        };
        let Some(credits) = intent.credit_quantity() else {
            warn!(intent_id = %intent.id, "Package purchase without credit quantity, skipping");
            return Ok(false);
        };

        let granted = self
            .learner_repo
            .grant_credits_if_unprocessed(learner_id, &intent.id, credits)
            .await?;

        if granted {
            info!(%learner_id, intent_id = %intent.id, credits, "Credits granted from webhook");
        } else {
            info!(%learner_id, intent_id = %intent.id, "Duplicate webhook delivery, no-op");
        }

        Ok(granted)
    }

    /// Create a package-purchase intent with the processor.
    pub async fn create_package_intent(
        &self,
        learner: &LearnerProfile,
        credits: i32,
    ) -> AppResult<IntentHandle> {
        if credits <= 0 {
            return Err(AppError::validation("Credit quantity must be positive"));
        }

        let amount_cents = (self.config.credits_package_price * 100.0).round() as i64 * credits as i64;
        let metadata = HashMap::from([
            (META_KIND.to_string(), KIND_PACKAGE_PURCHASE.to_string()),
            (META_CREDITS.to_string(), credits.to_string()),
            (META_LEARNER_ID.to_string(), learner.id.to_string()),
        ]);

        self.processor
            .create_intent(amount_cents, &self.config.currency, metadata)
            .await
    }

    /// Retrieve an intent's status, opportunistically reconciling a
    /// succeeded package purchase so the synchronous poll path also
    /// grants credits as soon as they are available.
    pub async fn intent_status(
        &self,
        learner: &LearnerProfile,
        intent_id: &str,
    ) -> AppResult<PaymentIntent> {
        let intent = self.processor.retrieve_intent(intent_id).await?;

        if intent.status == IntentStatus::Succeeded
            && intent.is_package_purchase()
            && intent.learner_id() == Some(learner.id)
        {
            if let Some(credits) = intent.credit_quantity() {
                self.learner_repo
                    .grant_credits_if_unprocessed(learner.id, intent_id, credits)
                    .await?;
            }
        }

        Ok(intent)
    }

    /// Refund lesson credits after a cancellation.
    pub async fn refund(&self, learner_id: Uuid, credits: i32) -> AppResult<()> {
        self.learner_repo.refund_credits(learner_id, credits).await
    }

    /// Administrative credit grant keyed by a synthetic reference so a
    /// retried adjustment never double-applies.
    pub async fn admin_grant(
        &self,
        learner_id: Uuid,
        credits: i32,
        adjustment_ref: &str,
    ) -> AppResult<bool> {
        self.learner_repo
            .grant_credits_if_unprocessed(learner_id, adjustment_ref, credits)
            .await
    }
}
