// Business policy constants
//
// The scoring weights and the tax/coupon figures are operator policy, not
// algorithm. They are injected from here (with env overrides) so the
// selector and the pricing path never hard-code them.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

/// Weights for the outlet-selection score
///
/// The score for a candidate outlet is
/// `distance_km + priority * priority_weight + prep_minutes / prep_time_divisor`,
/// lower is better. With the defaults, distance dominates unless priority or
/// preparation-time differences are large.
#[derive(Debug, Clone)]
pub struct ScoringPolicy {
    pub priority_weight: f64,
    pub prep_time_divisor: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            priority_weight: 2.0,
            prep_time_divisor: 10.0,
        }
    }
}

/// Flat pricing policy: one tax rate plus a recognized-coupon table
///
/// This is deliberately a lookup table, not a promotions engine.
#[derive(Debug, Clone)]
pub struct PricingPolicy {
    /// Tax applied to every suborder subtotal (e.g. 0.05 for 5%)
    pub tax_rate: Decimal,
    /// Coupon code (uppercase) to discount rate
    pub coupons: HashMap<String, Decimal>,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        let mut coupons = HashMap::new();
        coupons.insert("WELCOME10".to_string(), Decimal::new(10, 2));
        Self {
            tax_rate: Decimal::new(5, 2),
            coupons,
        }
    }
}

impl PricingPolicy {
    /// Build the policy, honoring a TAX_RATE env override when present
    pub fn from_env() -> Self {
        let mut policy = Self::default();
        if let Ok(raw) = std::env::var("TAX_RATE") {
            match Decimal::from_str(&raw) {
                Ok(rate) if rate >= Decimal::ZERO => policy.tax_rate = rate,
                _ => tracing::warn!("Ignoring invalid TAX_RATE override: {}", raw),
            }
        }
        policy
    }

    /// Discount rate for a coupon code, if the code is recognized
    ///
    /// Matching is case-insensitive; unknown codes simply yield no discount.
    pub fn coupon_rate(&self, code: &str) -> Option<Decimal> {
        self.coupons.get(code.trim().to_uppercase().as_str()).copied()
    }
}
