//! Learner profile repository, including all credit-ledger mutations.
//!
//! Credit writes are deliberately funneled through three operations:
//! a guarded debit, an unconditional refund, and an insert-if-absent
//! grant keyed by the external payment reference. No other code mutates
//! `lesson_credits`.

use sqlx::PgPool;
use uuid::Uuid;

use lessonhub_core::error::{AppError, ErrorKind};
use lessonhub_core::result::AppResult;
use lessonhub_entity::credit::ProcessedPaymentIntent;
use lessonhub_entity::learner::{CreateLearnerProfile, LearnerProfile, UpdateLearnerProfile};

/// Repository for learner profiles and the credit ledger.
#[derive(Debug, Clone)]
pub struct LearnerRepository {
    pool: PgPool,
}

impl LearnerRepository {
    /// Create a new learner repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new learner profile.
    pub async fn create(&self, profile: &CreateLearnerProfile) -> AppResult<LearnerProfile> {
        sqlx::query_as::<_, LearnerProfile>(
            "INSERT INTO learner_profiles (user_id, licence_number, licence_state, goals) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(profile.user_id)
        .bind(&profile.licence_number)
        .bind(&profile.licence_state)
        .bind(&profile.goals)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            super::map_db_error(
                e,
                "Failed to create learner profile",
                "Learner profile already exists for this user",
            )
        })
    }

    /// Find a profile by its own id.
    pub async fn find_by_id(&self, profile_id: Uuid) -> AppResult<Option<LearnerProfile>> {
        sqlx::query_as::<_, LearnerProfile>("SELECT * FROM learner_profiles WHERE id = $1")
            .bind(profile_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find learner profile", e)
            })
    }

    /// Find a profile by its owning user id.
    pub async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<LearnerProfile>> {
        sqlx::query_as::<_, LearnerProfile>("SELECT * FROM learner_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to find learner profile by user",
                    e,
                )
            })
    }

    /// Update mutable profile fields.
    pub async fn update(
        &self,
        profile_id: Uuid,
        update: &UpdateLearnerProfile,
    ) -> AppResult<LearnerProfile> {
        sqlx::query_as::<_, LearnerProfile>(
            "UPDATE learner_profiles SET \
                licence_number = COALESCE($1, licence_number), \
                licence_state = COALESCE($2, licence_state), \
                goals = COALESCE($3, goals), \
                updated_at = NOW() \
             WHERE id = $4 RETURNING *",
        )
        .bind(&update.licence_number)
        .bind(&update.licence_state)
        .bind(&update.goals)
        .bind(profile_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update learner profile", e)
        })
    }

    /// Current credit balance.
    pub async fn credit_balance(&self, profile_id: Uuid) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>("SELECT lesson_credits FROM learner_profiles WHERE id = $1")
            .bind(profile_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to read credit balance", e)
            })?
            .ok_or_else(|| AppError::not_found("Learner profile not found"))
    }

    /// Attempt to debit credits. Returns `true` only if the balance was
    /// sufficient and the debit was applied — the guard in the WHERE
    /// clause is what keeps the balance non-negative under concurrency.
    pub async fn try_debit_credits(&self, profile_id: Uuid, amount: i32) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE learner_profiles \
             SET lesson_credits = lesson_credits - $1, updated_at = NOW() \
             WHERE id = $2 AND lesson_credits >= $1",
        )
        .bind(amount)
        .bind(profile_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to debit credits", e))?;

        Ok(result.rows_affected() == 1)
    }

    /// Refund credits back onto the ledger (cancellations).
    pub async fn refund_credits(&self, profile_id: Uuid, amount: i32) -> AppResult<()> {
        sqlx::query(
            "UPDATE learner_profiles \
             SET lesson_credits = lesson_credits + $1, updated_at = NOW() \
             WHERE id = $2",
        )
        .bind(amount)
        .bind(profile_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to refund credits", e))?;
        Ok(())
    }

    /// Grant credits for an external payment reference exactly once.
    ///
    /// The reference insert and the balance increment run in one
    /// transaction; `ON CONFLICT DO NOTHING` on the unique reference makes
    /// this the atomic "add reference if absent" the reconciliation paths
    /// race through. Returns `true` if this call performed the grant,
    /// `false` if the reference had already been processed.
    pub async fn grant_credits_if_unprocessed(
        &self,
        profile_id: Uuid,
        payment_intent_id: &str,
        credits: i32,
    ) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let inserted = sqlx::query(
            "INSERT INTO processed_payment_intents (learner_id, payment_intent_id, credits_granted) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (payment_intent_id) DO NOTHING",
        )
        .bind(profile_id)
        .bind(payment_intent_id)
        .bind(credits)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record payment reference", e)
        })?
        .rows_affected()
            == 1;

        if inserted {
            sqlx::query(
                "UPDATE learner_profiles \
                 SET lesson_credits = lesson_credits + $1, updated_at = NOW() \
                 WHERE id = $2",
            )
            .bind(credits)
            .bind(profile_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to grant credits", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit credit grant", e)
        })?;

        Ok(inserted)
    }

    /// List the processed payment references for a learner.
    pub async fn list_processed_intents(
        &self,
        profile_id: Uuid,
    ) -> AppResult<Vec<ProcessedPaymentIntent>> {
        sqlx::query_as::<_, ProcessedPaymentIntent>(
            "SELECT * FROM processed_payment_intents WHERE learner_id = $1 \
             ORDER BY processed_at DESC",
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list payment references", e)
        })
    }
}
