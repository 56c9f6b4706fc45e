// Outlet location queries
//
// Pure range filtering over outlet slices plus the service that joins range
// hits with brand availability. "Nothing in range" is an empty result, never
// an error.

use std::cmp::Ordering;

use crate::availability::AvailabilityIndex;
use crate::discovery::models::OutletWithLink;
use crate::discovery::repository::OutletRepository;
use crate::error::ApiError;
use crate::geo::{self, Coordinate};
use crate::models::Outlet;

/// Filter a set of outlets to those within `radius_km` of `center`
///
/// Inactive outlets and outlets without a usable coordinate are skipped.
/// Results are ascending by distance, ties broken by outlet id so ordering
/// is stable across calls.
pub fn outlets_within_radius(
    outlets: &[Outlet],
    center: Coordinate,
    radius_km: f64,
) -> Vec<(Outlet, f64)> {
    let mut in_range: Vec<(Outlet, f64)> = outlets
        .iter()
        .filter(|o| o.is_active)
        .filter_map(|o| {
            let coord = o.coordinate()?;
            let d = geo::distance_km(center, coord);
            (d <= radius_km).then(|| (o.clone(), d))
        })
        .collect();

    in_range.sort_by(|a, b| match a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal) {
        Ordering::Equal => a.0.id.cmp(&b.0.id),
        other => other,
    });

    in_range
}

/// Service answering "which outlets are near this coordinate" and "which
/// outlets serve this brand near this coordinate"
#[derive(Clone)]
pub struct OutletLocator {
    outlets: OutletRepository,
    availability: AvailabilityIndex,
}

impl OutletLocator {
    /// Create a new OutletLocator
    pub fn new(outlets: OutletRepository, availability: AvailabilityIndex) -> Self {
        Self {
            outlets,
            availability,
        }
    }

    /// Active outlets within `radius_km` of `center`, nearest first
    pub async fn within_radius(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<(Outlet, f64)>, ApiError> {
        let all = self.outlets.find_active().await?;
        Ok(outlets_within_radius(&all, center, radius_km))
    }

    /// Outlets serving `brand_id` within `radius_km`, with their link terms
    ///
    /// Intersects the range scan with the brand's available links; each
    /// result carries the outlet, the link, and the full-precision distance.
    /// Pass `f64::INFINITY` for an unbounded candidate set.
    pub async fn serving_brand(
        &self,
        brand_id: i32,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<OutletWithLink>, ApiError> {
        let links = self.availability.links_for_brand(brand_id).await?;
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let in_range = self.within_radius(center, radius_km).await?;

        // Distance order is preserved from the range scan
        let candidates = in_range
            .into_iter()
            .filter_map(|(outlet, distance_km)| {
                let link = links.iter().find(|l| l.outlet_id == outlet.id)?.clone();
                Some(OutletWithLink {
                    outlet,
                    link,
                    distance_km,
                })
            })
            .collect();

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outlet_at(id: i32, lat: f64, lon: f64) -> Outlet {
        Outlet {
            id,
            name: format!("Outlet {}", id),
            latitude: Some(lat),
            longitude: Some(lon),
            is_active: true,
            delivery_available: true,
            pickup_available: true,
            delivery_radius_km: 10.0,
        }
    }

    fn center() -> Coordinate {
        Coordinate::new(12.9716, 77.5946).unwrap()
    }

    // Moving ~0.009 degrees of latitude is very close to 1 km
    fn outlet_km_north(id: i32, km: f64) -> Outlet {
        outlet_at(id, 12.9716 + km * 0.0089932, 77.5946)
    }

    #[test]
    fn test_radius_boundary_inclusion() {
        let outlets = vec![outlet_km_north(1, 9.9), outlet_km_north(2, 12.0)];
        let hits = outlets_within_radius(&outlets, center(), 10.0);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0.id, 1);
        assert!(hits[0].1 < 10.0);
    }

    #[test]
    fn test_empty_when_nothing_in_range() {
        let outlets = vec![outlet_km_north(1, 50.0)];
        assert!(outlets_within_radius(&outlets, center(), 10.0).is_empty());
    }

    #[test]
    fn test_results_sorted_nearest_first() {
        let outlets = vec![
            outlet_km_north(1, 8.0),
            outlet_km_north(2, 2.0),
            outlet_km_north(3, 5.0),
        ];
        let hits = outlets_within_radius(&outlets, center(), 10.0);
        let ids: Vec<i32> = hits.iter().map(|(o, _)| o.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_inactive_outlets_skipped() {
        let mut inactive = outlet_km_north(1, 1.0);
        inactive.is_active = false;
        let hits = outlets_within_radius(&[inactive], center(), 10.0);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_null_coordinate_outlets_skipped() {
        let mut unplaced = outlet_km_north(1, 1.0);
        unplaced.longitude = None;
        let hits = outlets_within_radius(&[unplaced], center(), 10.0);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_equal_distance_ties_broken_by_id() {
        let outlets = vec![outlet_km_north(9, 3.0), outlet_km_north(4, 3.0)];
        let hits = outlets_within_radius(&outlets, center(), 10.0);
        assert_eq!(hits[0].0.id, 4);
        assert_eq!(hits[1].0.id, 9);
    }

    #[test]
    fn test_unbounded_radius_includes_everything_placed() {
        let outlets = vec![outlet_km_north(1, 500.0), outlet_km_north(2, 2.0)];
        let hits = outlets_within_radius(&outlets, center(), f64::INFINITY);
        assert_eq!(hits.len(), 2);
    }
}
