use rust_decimal::{Decimal, RoundingStrategy};

use crate::policy::PricingPolicy;

/// Service for computing suborder financials
///
/// All currency math is `Decimal`; results are rounded to 2 decimal places
/// with midpoint-away-from-zero, matching how amounts are stored.
pub struct PriceCalculator;

impl PriceCalculator {
    /// Line total for one item: quantity x unit price at time of order
    pub fn line_total(quantity: i32, unit_price: Decimal) -> Decimal {
        Decimal::from(quantity) * unit_price
    }

    /// Group subtotal: sum of line totals
    pub fn subtotal(line_totals: &[Decimal]) -> Decimal {
        line_totals.iter().sum()
    }

    /// Tax on a subtotal at the policy rate
    pub fn tax(subtotal: Decimal, policy: &PricingPolicy) -> Decimal {
        round_money(subtotal * policy.tax_rate)
    }

    /// Discount on a subtotal for an optional coupon code
    ///
    /// Unknown or absent codes yield a zero discount, never an error.
    pub fn discount(subtotal: Decimal, coupon_code: Option<&str>, policy: &PricingPolicy) -> Decimal {
        let rate = coupon_code.and_then(|code| policy.coupon_rate(code));
        match rate {
            Some(rate) => round_money(subtotal * rate),
            None => Decimal::ZERO,
        }
    }

    /// Grand total: subtotal + delivery fee + tax - discount
    pub fn total(
        subtotal: Decimal,
        delivery_fee: Decimal,
        tax: Decimal,
        discount: Decimal,
    ) -> Decimal {
        round_money(subtotal + delivery_fee + tax - discount)
    }
}

fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_total() {
        assert_eq!(PriceCalculator::line_total(2, dec!(149.50)), dec!(299.00));
        assert_eq!(PriceCalculator::line_total(1, dec!(99.00)), dec!(99.00));
    }

    #[test]
    fn test_subtotal() {
        let lines = vec![dec!(299.00), dec!(99.00), dec!(45.50)];
        assert_eq!(PriceCalculator::subtotal(&lines), dec!(443.50));
        assert_eq!(PriceCalculator::subtotal(&[]), dec!(0));
    }

    #[test]
    fn test_tax_at_five_percent() {
        let policy = PricingPolicy::default();
        assert_eq!(PriceCalculator::tax(dec!(200.00), &policy), dec!(10.00));
        assert_eq!(PriceCalculator::tax(dec!(99.99), &policy), dec!(5.00));
    }

    #[test]
    fn test_welcome_coupon_discount() {
        let policy = PricingPolicy::default();
        assert_eq!(
            PriceCalculator::discount(dec!(500.00), Some("WELCOME10"), &policy),
            dec!(50.00)
        );
    }

    #[test]
    fn test_unknown_coupon_no_discount() {
        let policy = PricingPolicy::default();
        assert_eq!(
            PriceCalculator::discount(dec!(500.00), Some("NOPE"), &policy),
            dec!(0)
        );
        assert_eq!(PriceCalculator::discount(dec!(500.00), None, &policy), dec!(0));
    }

    #[test]
    fn test_total_combines_all_parts() {
        // 400 + 30 delivery + 20 tax - 40 discount = 410
        assert_eq!(
            PriceCalculator::total(dec!(400.00), dec!(30.00), dec!(20.00), dec!(40.00)),
            dec!(410.00)
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn money(cents: u32) -> Decimal {
        Decimal::from(cents) / Decimal::from(100)
    }

    /// Line total equals quantity x unit price for all valid inputs
    #[test]
    fn prop_line_total_invariant() {
        proptest!(|(
            quantity in 1i32..=1000,
            price_cents in 1u32..=100000u32
        )| {
            let price = money(price_cents);
            let line = PriceCalculator::line_total(quantity, price);
            prop_assert_eq!(line, Decimal::from(quantity) * price);
        });
    }

    /// Totals are never negative when the discount rate is at most 100%
    #[test]
    fn prop_totals_are_non_negative() {
        proptest!(|(
            line_cents in prop::collection::vec(1u32..=100000u32, 1..=12),
            fee_cents in 0u32..=10000u32,
        )| {
            let policy = PricingPolicy::default();
            let lines: Vec<Decimal> = line_cents.iter().map(|&c| money(c)).collect();
            let subtotal = PriceCalculator::subtotal(&lines);
            let tax = PriceCalculator::tax(subtotal, &policy);
            let discount = PriceCalculator::discount(subtotal, Some("WELCOME10"), &policy);
            let total = PriceCalculator::total(subtotal, money(fee_cents), tax, discount);
            prop_assert!(total >= Decimal::ZERO, "negative total: {}", total);
        });
    }

    /// Subtotal is independent of line ordering
    #[test]
    fn prop_subtotal_is_commutative() {
        proptest!(|(
            line_cents in prop::collection::vec(1u32..=100000u32, 2..=10)
        )| {
            let lines: Vec<Decimal> = line_cents.iter().map(|&c| money(c)).collect();
            let mut reversed = lines.clone();
            reversed.reverse();
            prop_assert_eq!(
                PriceCalculator::subtotal(&lines),
                PriceCalculator::subtotal(&reversed)
            );
        });
    }

    /// A line's total depends only on its captured unit price: recomputing
    /// with a changed menu price does not affect the stored snapshot value
    #[test]
    fn prop_snapshot_price_is_stable() {
        proptest!(|(
            quantity in 1i32..=100,
            old_cents in 1u32..=100000u32,
            new_cents in 1u32..=100000u32,
        )| {
            let snapshot = money(old_cents);
            let stored = PriceCalculator::line_total(quantity, snapshot);
            // Menu price moves; the stored line total must not
            let _menu_now = money(new_cents);
            prop_assert_eq!(stored, PriceCalculator::line_total(quantity, snapshot));
        });
    }
}
