//! Booking entities: lifecycle status, pricing, and the booking model.

pub mod model;
pub mod pricing;
pub mod status;

pub use model::{Booking, CreateBooking};
pub use pricing::PricingBreakdown;
pub use status::{BookingStatus, CancelActor, PaymentMethod, PaymentStatus};
