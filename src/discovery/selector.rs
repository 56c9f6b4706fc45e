// Outlet selection policy
//
// Ranks the outlets serving a brand for one customer coordinate. The score
// blends distance, operator priority and preparation speed; the distance
// weight dominates unless the other terms differ sharply. Scores compare on
// full precision, display rounding happens at the response edge.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::discovery::locator::OutletLocator;
use crate::discovery::models::{AssignItem, OutletWithLink};
use crate::error::ApiError;
use crate::geo::Coordinate;
use crate::policy::ScoringPolicy;

/// Two scores closer than this are a tie
pub const SCORE_EPSILON: f64 = 1e-9;

/// Scalar score for one candidate; lower wins
pub fn score(policy: &ScoringPolicy, candidate: &OutletWithLink) -> f64 {
    candidate.distance_km
        + candidate.link.priority as f64 * policy.priority_weight
        + candidate.link.preparation_time_minutes as f64 / policy.prep_time_divisor
}

fn cmp_by_distance_then_id(a: &OutletWithLink, b: &OutletWithLink) -> Ordering {
    a.distance_km
        .total_cmp(&b.distance_km)
        .then_with(|| a.outlet.id.cmp(&b.outlet.id))
}

/// Order candidates by score, then distance, then outlet id
///
/// The sort runs on a total order, so the result never depends on the input
/// order of the candidates. An epsilon tie rule cannot live inside the sort
/// comparator (near-equality is not transitive); instead, after the sort,
/// the leading group of candidates whose scores tie the minimum within
/// [`SCORE_EPSILON`] is re-decided on lower distance, then lower outlet id.
pub fn rank_by_score(policy: &ScoringPolicy, mut candidates: Vec<OutletWithLink>) -> Vec<OutletWithLink> {
    candidates.sort_by(|a, b| {
        score(policy, a)
            .total_cmp(&score(policy, b))
            .then_with(|| cmp_by_distance_then_id(a, b))
    });
    promote_tied_leader(&mut candidates, |c| score(policy, c), cmp_by_distance_then_id);
    candidates
}

/// Order candidates purely by distance, ties broken by outlet id
///
/// Same shape as [`rank_by_score`]: a total-order sort, then the leading
/// near-tie group on distance is re-decided on the lower outlet id.
pub fn rank_by_distance(mut candidates: Vec<OutletWithLink>) -> Vec<OutletWithLink> {
    candidates.sort_by(cmp_by_distance_then_id);
    promote_tied_leader(
        &mut candidates,
        |c| c.distance_km,
        |a, b| a.outlet.id.cmp(&b.outlet.id),
    );
    candidates
}

/// Move the rightful winner of the leading near-tie group to the front
///
/// `ranked` must already be sorted ascending on `key`. Candidates whose key
/// is within [`SCORE_EPSILON`] of the minimum count as tied; `tie_break`
/// picks the winner among them.
fn promote_tied_leader(
    ranked: &mut [OutletWithLink],
    key: impl Fn(&OutletWithLink) -> f64,
    tie_break: impl Fn(&OutletWithLink, &OutletWithLink) -> Ordering,
) {
    let best = match ranked.first() {
        Some(first) => key(first),
        None => return,
    };
    let tied = ranked
        .iter()
        .take_while(|c| (key(c) - best).abs() <= SCORE_EPSILON)
        .count();
    if tied < 2 {
        return;
    }
    let winner = ranked[..tied]
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| tie_break(a, b))
        .map(|(i, _)| i)
        .unwrap_or(0);
    ranked[..=winner].rotate_right(1);
}

/// Service choosing the best outlet for one brand and customer coordinate
#[derive(Clone)]
pub struct OutletSelector {
    locator: OutletLocator,
    policy: Arc<ScoringPolicy>,
}

impl OutletSelector {
    /// Create a new OutletSelector
    pub fn new(locator: OutletLocator, policy: Arc<ScoringPolicy>) -> Self {
        Self { locator, policy }
    }

    /// Pick the best outlet serving `brand_id` for this customer
    ///
    /// The candidate set is every active outlet with an available link for
    /// the brand, regardless of delivery radius; radius eligibility belongs
    /// to delivery-availability consumers, not to selection. `items` is
    /// accepted for future stock-aware scoring and is not consulted by the
    /// current policy.
    ///
    /// Returns `BrandNotServed` when no outlet serves the brand at all,
    /// which is distinct from the outlet table being empty.
    pub async fn select_best_outlet(
        &self,
        brand_id: i32,
        customer: Coordinate,
        _items: &[AssignItem],
    ) -> Result<OutletWithLink, ApiError> {
        let candidates = self
            .locator
            .serving_brand(brand_id, customer, f64::INFINITY)
            .await?;

        tracing::debug!(
            "Selecting outlet for brand {} among {} candidates",
            brand_id,
            candidates.len()
        );

        rank_by_score(&self.policy, candidates)
            .into_iter()
            .next()
            .ok_or(ApiError::BrandNotServed { brand_id })
    }

    /// Nearest outlet serving `brand_id`, ignoring priority and prep time
    ///
    /// Used when the caller has already fixed an address and just wants
    /// proximity, e.g. default outlet assignment at checkout.
    pub async fn nearest_outlet_for_brand(
        &self,
        brand_id: i32,
        customer: Coordinate,
    ) -> Result<OutletWithLink, ApiError> {
        let candidates = self
            .locator
            .serving_brand(brand_id, customer, f64::INFINITY)
            .await?;

        rank_by_distance(candidates)
            .into_iter()
            .next()
            .ok_or(ApiError::BrandNotServed { brand_id })
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::availability::BrandOutletLink;
    use crate::models::Outlet;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn candidate(outlet_id: i32, distance_km: f64, priority: i32, prep: i32) -> OutletWithLink {
        OutletWithLink {
            outlet: Outlet {
                id: outlet_id,
                name: format!("Outlet {}", outlet_id),
                latitude: Some(12.9),
                longitude: Some(77.6),
                is_active: true,
                delivery_available: true,
                pickup_available: true,
                delivery_radius_km: 10.0,
            },
            link: BrandOutletLink {
                outlet_id,
                brand_id: 1,
                is_available: true,
                preparation_time_minutes: prep,
                minimum_order_amount: dec!(0),
                delivery_fee: dec!(30),
                priority,
            },
            distance_km,
        }
    }

    /// Holding priority and prep time fixed, moving a candidate strictly
    /// closer never worsens its rank position
    #[test]
    fn prop_rank_is_monotonic_in_distance() {
        proptest!(|(
            base_distance in 0.1f64..50.0,
            improvement in 0.05f64..0.95,
            rival_distances in prop::collection::vec(0.0f64..50.0, 1..8),
            priority in 0i32..5,
            prep in 0i32..60,
        )| {
            let policy = ScoringPolicy::default();
            let subject_id = 1000;

            let rivals: Vec<OutletWithLink> = rival_distances
                .iter()
                .enumerate()
                .map(|(i, &d)| candidate(i as i32 + 1, d, priority, prep))
                .collect();

            let rank_of = |subject_distance: f64| -> usize {
                let mut all = rivals.clone();
                all.push(candidate(subject_id, subject_distance, priority, prep));
                rank_by_score(&policy, all)
                    .iter()
                    .position(|c| c.outlet.id == subject_id)
                    .unwrap()
            };

            let before = rank_of(base_distance);
            let after = rank_of(base_distance * improvement);
            prop_assert!(after <= before, "rank worsened from {} to {}", before, after);
        });
    }

    /// Scores are finite for any sane candidate set
    #[test]
    fn prop_score_is_finite() {
        proptest!(|(
            distance in 0.0f64..20000.0,
            priority in 0i32..100,
            prep in 0i32..600,
        )| {
            let policy = ScoringPolicy::default();
            let c = candidate(1, distance, priority, prep);
            prop_assert!(score(&policy, &c).is_finite());
        });
    }
}
