//! Deterministic pricing breakdown computed at booking creation.

use serde::{Deserialize, Serialize};

/// Platform fee as a fraction of the base rate.
pub const PLATFORM_FEE_RATE: f64 = 0.10;
/// GST as a fraction of the base rate.
pub const GST_RATE: f64 = 0.10;

/// Marketplace pricing breakdown for one booking.
///
/// Invariants: `total_amount = base_rate + platform_fee + gst`;
/// `instructor_payout = base_rate - platform_fee`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    /// Base lesson price (hourly rate × duration).
    pub base_rate: f64,
    /// Platform fee charged to the learner.
    pub platform_fee: f64,
    /// GST charged to the learner.
    pub gst: f64,
    /// Total amount the learner pays.
    pub total_amount: f64,
    /// Amount paid out to the instructor.
    pub instructor_payout: f64,
}

impl PricingBreakdown {
    /// Compute the full breakdown from a base rate.
    pub fn from_base_rate(base_rate: f64) -> Self {
        let platform_fee = base_rate * PLATFORM_FEE_RATE;
        let gst = base_rate * GST_RATE;
        Self {
            base_rate,
            platform_fee,
            gst,
            total_amount: base_rate + platform_fee + gst,
            instructor_payout: base_rate - platform_fee,
        }
    }

    /// Compute the breakdown for a lesson of `duration_hours` at the
    /// instructor's hourly rate.
    pub fn for_lesson(hourly_rate: f64, duration_hours: i32) -> Self {
        Self::from_base_rate(hourly_rate * duration_hours as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_breakdown_invariants() {
        let p = PricingBreakdown::from_base_rate(80.0);
        assert!((p.platform_fee - 8.0).abs() < EPS);
        assert!((p.gst - 8.0).abs() < EPS);
        assert!((p.total_amount - 96.0).abs() < EPS);
        assert!((p.instructor_payout - 72.0).abs() < EPS);
    }

    #[test]
    fn test_two_hour_lesson() {
        let p = PricingBreakdown::for_lesson(75.0, 2);
        assert!((p.base_rate - 150.0).abs() < EPS);
        assert!((p.total_amount - 180.0).abs() < EPS);
        assert!((p.instructor_payout - 135.0).abs() < EPS);
    }

    #[test]
    fn test_total_equals_parts() {
        for base in [0.0, 12.5, 99.99, 1234.56] {
            let p = PricingBreakdown::from_base_rate(base);
            assert!((p.total_amount - (p.base_rate + p.platform_fee + p.gst)).abs() < EPS);
            assert!((p.instructor_payout - (p.base_rate - p.platform_fee)).abs() < EPS);
        }
    }
}
