//! In-app notifications and fire-and-forget outbound delivery.

pub mod channel;
pub mod service;

pub use channel::{EmailChannel, NotificationChannel, SmsChannel};
pub use service::NotificationService;
