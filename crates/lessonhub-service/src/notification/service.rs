//! Notification service: writes in-app rows and dispatches outbound
//! delivery. Every public method is infallible from the caller's point of
//! view — failures are logged and swallowed so they can never fail or
//! roll back an already-confirmed booking.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_database::repositories::notification::NotificationRepository;
use lessonhub_database::repositories::user::UserRepository;
use lessonhub_entity::booking::Booking;
use lessonhub_entity::notification::{Notification, NotificationKind};

use super::channel::NotificationChannel;
use crate::context::RequestContext;

/// In-app and outbound notification dispatch.
pub struct NotificationService {
    notification_repo: Arc<NotificationRepository>,
    user_repo: Arc<UserRepository>,
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("channels", &self.channels.len())
            .finish()
    }
}

impl NotificationService {
    /// Creates a new notification service. An empty channel list disables
    /// outbound delivery; in-app rows are still written.
    pub fn new(
        notification_repo: Arc<NotificationRepository>,
        user_repo: Arc<UserRepository>,
        channels: Vec<Arc<dyn NotificationChannel>>,
    ) -> Self {
        Self {
            notification_repo,
            user_repo,
            channels,
        }
    }

    /// Booking confirmed: notify both parties.
    pub async fn booking_confirmed(
        &self,
        booking: &Booking,
        learner_user_id: Uuid,
        instructor_user_id: Uuid,
    ) {
        let title = "Lesson booked";
        let message = format!(
            "Lesson on {} at {} is confirmed",
            booking.lesson_date, booking.start_time
        );
        self.send(
            learner_user_id,
            NotificationKind::BookingConfirmed,
            title,
            &message,
            Some(booking.id),
        )
        .await;
        self.send(
            instructor_user_id,
            NotificationKind::BookingConfirmed,
            title,
            &message,
            Some(booking.id),
        )
        .await;
    }

    /// Booking cancelled: notify both parties.
    pub async fn booking_cancelled(
        &self,
        booking: &Booking,
        learner_user_id: Uuid,
        instructor_user_id: Uuid,
    ) {
        let title = "Lesson cancelled";
        let reason = booking
            .cancellation_reason
            .as_deref()
            .unwrap_or("No reason given");
        let message = format!(
            "Lesson on {} at {} was cancelled: {reason}",
            booking.lesson_date, booking.start_time
        );
        self.send(
            learner_user_id,
            NotificationKind::BookingCancelled,
            title,
            &message,
            Some(booking.id),
        )
        .await;
        self.send(
            instructor_user_id,
            NotificationKind::BookingCancelled,
            title,
            &message,
            Some(booking.id),
        )
        .await;
    }

    /// Credits granted after a package purchase.
    pub async fn credits_granted(&self, user_id: Uuid, credits: i32) {
        self.send(
            user_id,
            NotificationKind::CreditsGranted,
            "Credits added",
            &format!("{credits} lesson credits were added to your account"),
            None,
        )
        .await;
    }

    /// List a user's in-app notifications.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        self.notification_repo.list_for_user(ctx.user_id, &page).await
    }

    /// Count unread in-app notifications.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.notification_repo.count_unread(ctx.user_id).await
    }

    /// Mark one notification read.
    pub async fn mark_read(&self, ctx: &RequestContext, notification_id: Uuid) -> AppResult<()> {
        self.notification_repo
            .mark_read(notification_id, ctx.user_id)
            .await
    }

    /// Write the in-app row and dispatch to every channel, logging and
    /// swallowing failures.
    async fn send(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        title: &str,
        message: &str,
        reference_id: Option<Uuid>,
    ) {
        if let Err(e) = self
            .notification_repo
            .create(user_id, kind.as_str(), title, message, reference_id)
            .await
        {
            warn!(%user_id, error = %e, "Failed to write in-app notification");
        }

        if self.channels.is_empty() {
            return;
        }

        let recipient = match self.user_repo.find_by_id(user_id).await {
            Ok(Some(user)) => user.email,
            Ok(None) => {
                warn!(%user_id, "Notification recipient no longer exists");
                return;
            }
            Err(e) => {
                warn!(%user_id, error = %e, "Failed to load notification recipient");
                return;
            }
        };

        for channel in &self.channels {
            let channel = Arc::clone(channel);
            let recipient = recipient.clone();
            let title = title.to_string();
            let message = message.to_string();
            tokio::spawn(async move {
                match channel.deliver(&recipient, &title, &message).await {
                    Ok(delivery_id) => {
                        tracing::debug!(
                            channel = channel.name(),
                            delivery_id,
                            "Notification delivered"
                        );
                    }
                    Err(e) => {
                        warn!(channel = channel.name(), error = %e, "Notification delivery failed");
                    }
                }
            });
        }
    }
}
