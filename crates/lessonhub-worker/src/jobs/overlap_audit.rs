//! Overlap audit — the defensive backstop behind creation-time
//! prevention. Cancels later-created overlapping bookings with refund.

use std::sync::Arc;

use tracing::{info, warn};

use lessonhub_service::booking::BookingService;

/// Run one audit sweep.
pub async fn run(booking_service: &Arc<BookingService>) {
    match booking_service.correct_overlaps(false).await {
        Ok(cancelled) if cancelled.is_empty() => {
            info!("Overlap audit found no conflicting bookings");
        }
        Ok(cancelled) => {
            warn!(
                cancelled = cancelled.len(),
                "Overlap audit cancelled conflicting bookings"
            );
        }
        Err(e) => {
            warn!(error = %e, "Overlap audit failed");
        }
    }
}
