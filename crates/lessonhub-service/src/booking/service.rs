//! Booking lifecycle service.
//!
//! Creation is prepaid-only and serialized per slot: a fresh booking id is
//! reserved through the slot inventory's guarded updates *before* credits
//! are settled and the row is inserted, so two racing requests for the
//! same hour can never both reach `confirmed`.

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_database::repositories::booking::{BookingFilter, BookingRepository};
use lessonhub_database::repositories::instructor::InstructorRepository;
use lessonhub_database::repositories::learner::LearnerRepository;
use lessonhub_entity::booking::{
    Booking, BookingStatus, CancelActor, CreateBooking, PaymentStatus, PricingBreakdown,
};
use lessonhub_entity::availability::parse_slot_hour;
use lessonhub_entity::instructor::InstructorProfile;
use lessonhub_entity::learner::LearnerProfile;
use lessonhub_entity::user::UserRole;

use super::overlap::{find_conflicts, later_created_losers};
use crate::availability::inventory::{SlotInventory, slot_is_bookable};
use crate::context::RequestContext;
use crate::credit::CreditService;
use crate::notification::NotificationService;
use crate::resolve::resolve_instructor;

/// A learner's booking request, already validated at the API boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Instructor profile id (or owning user id — resolved here).
    pub instructor_id: Uuid,
    /// Lesson calendar date.
    pub lesson_date: NaiveDate,
    /// Lesson start time ("09:00" or "9:00 AM").
    pub start_time: String,
    /// Duration in whole hours.
    pub duration_hours: i32,
    /// Pickup location.
    pub pickup_location: Option<String>,
    /// Dropoff location.
    pub dropoff_location: Option<String>,
    /// External payment reference to verify when credits are short.
    pub payment_intent_id: Option<String>,
}

/// Booking lifecycle orchestration.
pub struct BookingService {
    booking_repo: Arc<BookingRepository>,
    learner_repo: Arc<LearnerRepository>,
    instructor_repo: Arc<InstructorRepository>,
    inventory: Arc<SlotInventory>,
    credits: Arc<CreditService>,
    notifier: Arc<NotificationService>,
}

impl std::fmt::Debug for BookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService").finish()
    }
}

impl BookingService {
    /// Creates a new booking service.
    pub fn new(
        booking_repo: Arc<BookingRepository>,
        learner_repo: Arc<LearnerRepository>,
        instructor_repo: Arc<InstructorRepository>,
        inventory: Arc<SlotInventory>,
        credits: Arc<CreditService>,
        notifier: Arc<NotificationService>,
    ) -> Self {
        Self {
            booking_repo,
            learner_repo,
            instructor_repo,
            inventory,
            credits,
            notifier,
        }
    }

    /// Create a booking under the prepaid-only policy.
    ///
    /// Sufficient credit confirms directly; insufficient credit with a
    /// verified package payment confirms after the grant; anything else is
    /// rejected with the insufficient-credits error. Slot reservation
    /// happens first, so a conflict leaves no state behind.
    pub async fn create_booking(
        &self,
        ctx: &RequestContext,
        request: BookingRequest,
    ) -> AppResult<Booking> {
        let learner = self.learner_profile_for(ctx).await?;
        let instructor = resolve_instructor(&self.instructor_repo, request.instructor_id).await?;

        let start_hour = parse_slot_hour(&request.start_time);
        self.validate_request(&instructor, &request, start_hour)?;

        // Overlap rule, checked against active bookings before any write.
        let existing = self
            .booking_repo
            .find_active_on_date(instructor.id, request.lesson_date)
            .await?;
        if !find_conflicts(start_hour, request.duration_hours, &existing).is_empty() {
            return Err(AppError::conflict(
                "The instructor already has a booking overlapping this time",
            ));
        }

        // Reserve every hour under a fresh booking id. The guarded slot
        // update is what serializes concurrent requests.
        let booking_id = Uuid::new_v4();
        self.inventory
            .reserve_lesson(
                instructor.id,
                request.lesson_date,
                start_hour,
                request.duration_hours,
                booking_id,
            )
            .await?;

        // Settle funds. On rejection the reserved hours are released.
        let settlement = match self
            .credits
            .settle_for_booking(
                &learner,
                request.duration_hours,
                request.payment_intent_id.as_deref(),
            )
            .await
        {
            Ok(settlement) => settlement,
            Err(e) => {
                self.inventory.release_lesson(booking_id).await?;
                return Err(e);
            }
        };

        let create = CreateBooking {
            id: booking_id,
            learner_id: learner.id,
            instructor_id: instructor.id,
            lesson_date: request.lesson_date,
            start_hour,
            duration_hours: request.duration_hours,
            pickup_location: request.pickup_location,
            dropoff_location: request.dropoff_location,
            pricing: PricingBreakdown::for_lesson(instructor.hourly_rate, request.duration_hours),
            payment_status: settlement.payment_status,
            payment_method: settlement.payment_method,
            payment_reference: settlement.payment_reference,
            status: BookingStatus::Confirmed,
        };

        let booking = match self.booking_repo.create(&create).await {
            Ok(booking) => booking,
            Err(e) => {
                // Unwind the hold and the debit so no slot or credit leaks.
                self.inventory.release_lesson(booking_id).await?;
                self.credits
                    .refund(learner.id, request.duration_hours)
                    .await?;
                return Err(e);
            }
        };

        info!(
            booking_id = %booking.id,
            learner_id = %learner.id,
            instructor_id = %instructor.id,
            date = %booking.lesson_date,
            start = %booking.start_time,
            "Booking confirmed"
        );

        self.notifier
            .booking_confirmed(&booking, learner.user_id, instructor.user_id)
            .await;

        Ok(booking)
    }

    /// Instructor acceptance: `pending → confirmed` only.
    pub async fn confirm_booking(&self, ctx: &RequestContext, booking_id: Uuid) -> AppResult<Booking> {
        let booking = self.get_owned_booking(ctx, booking_id).await?;
        self.require_instructor_or_admin(ctx, &booking).await?;

        if !booking.status.can_transition_to(BookingStatus::Confirmed) {
            return Err(AppError::validation(format!(
                "Cannot confirm a booking in status '{}'",
                booking.status
            )));
        }

        self.booking_repo
            .update_status(booking_id, BookingStatus::Confirmed)
            .await
    }

    /// Lesson start: `confirmed → in_progress`.
    pub async fn start_lesson(&self, ctx: &RequestContext, booking_id: Uuid) -> AppResult<Booking> {
        let booking = self.get_owned_booking(ctx, booking_id).await?;
        self.require_instructor_or_admin(ctx, &booking).await?;

        if !booking.status.can_transition_to(BookingStatus::InProgress) {
            return Err(AppError::validation(format!(
                "Cannot start a lesson in status '{}'",
                booking.status
            )));
        }

        self.booking_repo
            .update_status(booking_id, BookingStatus::InProgress)
            .await
    }

    /// Completion from any non-terminal state. Credits were settled at
    /// creation, so completion records the timestamp and nothing else.
    pub async fn complete_booking(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
    ) -> AppResult<Booking> {
        let booking = self.get_owned_booking(ctx, booking_id).await?;
        self.require_instructor_or_admin(ctx, &booking).await?;

        if !booking.status.can_transition_to(BookingStatus::Completed) {
            return Err(AppError::validation(format!(
                "Cannot complete a booking in status '{}'",
                booking.status
            )));
        }

        self.booking_repo.complete(booking_id).await
    }

    /// No-show marking by the instructor.
    pub async fn mark_no_show(&self, ctx: &RequestContext, booking_id: Uuid) -> AppResult<Booking> {
        let booking = self.get_owned_booking(ctx, booking_id).await?;
        self.require_instructor_or_admin(ctx, &booking).await?;

        if !booking.status.can_transition_to(BookingStatus::NoShow) {
            return Err(AppError::validation(format!(
                "Cannot mark no-show for a booking in status '{}'",
                booking.status
            )));
        }

        self.booking_repo
            .update_status(booking_id, BookingStatus::NoShow)
            .await
    }

    /// Cancellation by either party or an administrator. Refunds the
    /// lesson's credits and releases the reserved slots.
    pub async fn cancel_booking(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
        reason: &str,
    ) -> AppResult<Booking> {
        let booking = self.get_owned_booking(ctx, booking_id).await?;
        let actor = self.cancel_actor_for(ctx, &booking).await?;

        if !booking.status.can_transition_to(BookingStatus::Cancelled) {
            return Err(AppError::validation(format!(
                "Cannot cancel a booking in status '{}'",
                booking.status
            )));
        }

        self.cancel_and_refund(&booking, actor, reason).await
    }

    /// Payment-failure notification for a booking payment. Transitions to
    /// cancelled with a payment-failure reason; the credit ledger is not
    /// touched — no credits were ever granted for a failed payment.
    pub async fn payment_failed(&self, booking_id: Uuid, intent_id: &str) -> AppResult<()> {
        let Some(booking) = self.booking_repo.find_by_id(booking_id).await? else {
            warn!(%booking_id, intent_id, "Payment failure for unknown booking, ignoring");
            return Ok(());
        };

        if !booking.status.can_transition_to(BookingStatus::Cancelled) {
            info!(
                %booking_id,
                status = %booking.status,
                "Payment failure for settled booking, no transition"
            );
            return Ok(());
        }

        let cancelled = self
            .booking_repo
            .cancel(
                booking.id,
                CancelActor::System,
                &format!("Payment {intent_id} failed"),
                PaymentStatus::Failed,
            )
            .await?;
        self.inventory.release_lesson(booking.id).await?;

        self.notify_cancelled(&cancelled).await;

        Ok(())
    }

    /// Fetch a booking the caller is allowed to see.
    pub async fn get_booking(&self, ctx: &RequestContext, booking_id: Uuid) -> AppResult<Booking> {
        self.get_owned_booking(ctx, booking_id).await
    }

    /// The calling learner's bookings.
    pub async fn list_for_learner(
        &self,
        ctx: &RequestContext,
        filter: BookingFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let learner = self.learner_profile_for(ctx).await?;
        self.booking_repo
            .list_for_learner(learner.id, &filter, &page)
            .await
    }

    /// The calling instructor's bookings.
    pub async fn list_for_instructor(
        &self,
        ctx: &RequestContext,
        filter: BookingFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let instructor = self.instructor_profile_for(ctx).await?;
        self.booking_repo
            .list_for_instructor(instructor.id, &filter, &page)
            .await
    }

    /// Batch overlap corrector — the defensive backstop behind the
    /// creation-time prevention. Cancels (with refund) every later-created
    /// booking that overlaps an earlier-created survivor. Returns the
    /// cancelled booking ids; with `dry_run` nothing is written.
    pub async fn correct_overlaps(&self, dry_run: bool) -> AppResult<Vec<Uuid>> {
        let today = Utc::now().date_naive();
        let active = self.booking_repo.find_all_active_from(today).await?;
        let losers = later_created_losers(&active);

        if dry_run || losers.is_empty() {
            return Ok(losers);
        }

        for loser_id in &losers {
            let Some(booking) = self.booking_repo.find_by_id(*loser_id).await? else {
                continue;
            };
            self.cancel_and_refund(
                &booking,
                CancelActor::System,
                "Cancelled by overlap correction",
            )
            .await?;
            warn!(booking_id = %loser_id, "Overlap corrector cancelled booking");
        }

        Ok(losers)
    }

    // ── internals ────────────────────────────────────────────

    fn validate_request(
        &self,
        instructor: &InstructorProfile,
        request: &BookingRequest,
        start_hour: i16,
    ) -> AppResult<()> {
        if !(1..=8).contains(&request.duration_hours) {
            return Err(AppError::validation(
                "Lesson duration must be between 1 and 8 hours",
            ));
        }
        if start_hour + request.duration_hours as i16 > 24 {
            return Err(AppError::validation("Lesson cannot run past midnight"));
        }

        let settings = &instructor.calendar_settings.0;
        let now = Utc::now();
        let today = now.date_naive();
        let horizon = today
            .checked_add_days(Days::new(settings.max_advance_days as u64))
            .unwrap_or(today);

        if request.lesson_date < today || request.lesson_date > horizon {
            return Err(AppError::validation(format!(
                "Lessons can be booked up to {} days in advance",
                settings.max_advance_days
            )));
        }
        if !slot_is_bookable(request.lesson_date, start_hour, now, settings.min_notice_hours) {
            return Err(AppError::validation(format!(
                "Lessons require at least {} hours notice",
                settings.min_notice_hours
            )));
        }

        Ok(())
    }

    async fn cancel_and_refund(
        &self,
        booking: &Booking,
        actor: CancelActor,
        reason: &str,
    ) -> AppResult<Booking> {
        let cancelled = self
            .booking_repo
            .cancel(booking.id, actor, reason, PaymentStatus::Refunded)
            .await?;
        self.inventory.release_lesson(booking.id).await?;
        self.credits
            .refund(booking.learner_id, booking.duration_hours)
            .await?;

        info!(
            booking_id = %booking.id,
            ?actor,
            reason,
            credits_refunded = booking.duration_hours,
            "Booking cancelled"
        );

        self.notify_cancelled(&cancelled).await;

        Ok(cancelled)
    }

    async fn notify_cancelled(&self, booking: &Booking) {
        let learner_user = self
            .learner_repo
            .find_by_id(booking.learner_id)
            .await
            .ok()
            .flatten()
            .map(|p| p.user_id);
        let instructor_user = self
            .instructor_repo
            .find_by_id(booking.instructor_id)
            .await
            .ok()
            .flatten()
            .map(|p| p.user_id);

        if let (Some(learner), Some(instructor)) = (learner_user, instructor_user) {
            self.notifier
                .booking_cancelled(booking, learner, instructor)
                .await;
        }
    }

    async fn get_owned_booking(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
    ) -> AppResult<Booking> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking '{booking_id}' not found")))?;

        if ctx.is_admin() {
            return Ok(booking);
        }

        match ctx.role {
            UserRole::Learner => {
                let learner = self.learner_profile_for(ctx).await?;
                if booking.learner_id != learner.id {
                    return Err(AppError::forbidden("You can only access your own bookings"));
                }
            }
            UserRole::Instructor => {
                let instructor = self.instructor_profile_for(ctx).await?;
                if booking.instructor_id != instructor.id {
                    return Err(AppError::forbidden("You can only access your own bookings"));
                }
            }
            UserRole::Admin => {}
        }

        Ok(booking)
    }

    async fn require_instructor_or_admin(
        &self,
        ctx: &RequestContext,
        booking: &Booking,
    ) -> AppResult<()> {
        if ctx.is_admin() {
            return Ok(());
        }
        let instructor = self.instructor_profile_for(ctx).await.map_err(|_| {
            AppError::forbidden("Only the booked instructor may perform this action")
        })?;
        if booking.instructor_id != instructor.id {
            return Err(AppError::forbidden(
                "Only the booked instructor may perform this action",
            ));
        }
        Ok(())
    }

    async fn cancel_actor_for(
        &self,
        ctx: &RequestContext,
        booking: &Booking,
    ) -> AppResult<CancelActor> {
        if ctx.is_admin() {
            return Ok(CancelActor::System);
        }
        match ctx.role {
            UserRole::Learner => {
                let learner = self.learner_profile_for(ctx).await?;
                if booking.learner_id == learner.id {
                    Ok(CancelActor::Learner)
                } else {
                    Err(AppError::forbidden("You can only cancel your own bookings"))
                }
            }
            UserRole::Instructor => {
                let instructor = self.instructor_profile_for(ctx).await?;
                if booking.instructor_id == instructor.id {
                    Ok(CancelActor::Instructor)
                } else {
                    Err(AppError::forbidden("You can only cancel your own bookings"))
                }
            }
            UserRole::Admin => Ok(CancelActor::System),
        }
    }

    async fn learner_profile_for(&self, ctx: &RequestContext) -> AppResult<LearnerProfile> {
        self.learner_repo
            .find_by_user_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::forbidden("A learner profile is required for this action"))
    }

    async fn instructor_profile_for(&self, ctx: &RequestContext) -> AppResult<InstructorProfile> {
        self.instructor_repo
            .find_by_user_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::forbidden("An instructor profile is required for this action"))
    }
}
