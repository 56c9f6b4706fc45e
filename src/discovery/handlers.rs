// HTTP handlers for the discovery endpoints

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::availability::BrandOutletLink;
use crate::discovery::models::{
    AssignOutletRequest, AssignedOutletResponse, NearbyBrand, NearbyBrandsQuery,
    NearbyBrandsResponse, NearbyOutletSummary,
};
use crate::error::ApiError;
use crate::geo::{round_km_for_display, Coordinate};
use crate::models::{Brand, Outlet};

/// Group in-range outlets into brand entries sorted by nearest outlet
///
/// `in_range` must be distance-ascending, as the range scan produces it.
/// Ranking runs on the full-precision distances; the display-rounded value
/// only appears in the response fields, so two brands whose distances round
/// to the same 2 dp figure still order by their true distances.
fn group_nearby_brands(
    in_range: &[(Outlet, f64)],
    links: &[BrandOutletLink],
    brand_rows: Vec<Brand>,
) -> (Vec<NearbyBrand>, usize) {
    let mut by_brand: BTreeMap<i32, Vec<NearbyOutletSummary>> = BTreeMap::new();
    let mut nearest_by_brand: BTreeMap<i32, f64> = BTreeMap::new();
    let mut total_outlets = 0usize;

    for (outlet, distance) in in_range {
        let outlet_links: Vec<_> = links.iter().filter(|l| l.outlet_id == outlet.id).collect();
        if !outlet_links.is_empty() {
            total_outlets += 1;
        }
        for link in outlet_links {
            // First sighting of a brand is its nearest outlet
            nearest_by_brand.entry(link.brand_id).or_insert(*distance);
            by_brand
                .entry(link.brand_id)
                .or_default()
                .push(NearbyOutletSummary {
                    outlet_id: outlet.id,
                    outlet_name: outlet.name.clone(),
                    distance_km: round_km_for_display(*distance),
                    preparation_time_minutes: link.preparation_time_minutes,
                    minimum_order_amount: link.minimum_order_amount,
                    delivery_fee: link.delivery_fee,
                });
        }
    }

    let mut brands: Vec<(f64, NearbyBrand)> = brand_rows
        .into_iter()
        .filter_map(|brand| {
            let outlets = by_brand.remove(&brand.id)?;
            let nearest = *nearest_by_brand.get(&brand.id)?;
            Some((
                nearest,
                NearbyBrand {
                    brand_id: brand.id,
                    brand_name: brand.name,
                    nearest_distance_km: round_km_for_display(nearest),
                    outlets,
                },
            ))
        })
        .collect();

    brands.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then_with(|| a.1.brand_id.cmp(&b.1.brand_id))
    });

    (brands.into_iter().map(|(_, brand)| brand).collect(), total_outlets)
}

/// Handler for GET /api/brands/nearby
/// Lists the brands servable around a customer coordinate, grouped by brand
/// and sorted by each brand's nearest outlet
#[utoipa::path(
    get,
    path = "/api/brands/nearby",
    params(NearbyBrandsQuery),
    responses(
        (status = 200, description = "Brands servable within the radius", body = NearbyBrandsResponse),
        (status = 400, description = "Invalid coordinate or radius"),
        (status = 500, description = "Internal server error")
    ),
    tag = "discovery"
)]
pub async fn nearby_brands_handler(
    State(state): State<crate::AppState>,
    Query(params): Query<NearbyBrandsQuery>,
) -> Result<Json<NearbyBrandsResponse>, ApiError> {
    params.validate()?;
    let center = Coordinate::new(params.latitude, params.longitude)?;

    tracing::debug!(
        "Listing brands within {} km of ({}, {})",
        params.radius_km,
        params.latitude,
        params.longitude
    );

    let in_range = state.locator.within_radius(center, params.radius_km).await?;
    if in_range.is_empty() {
        return Ok(Json(NearbyBrandsResponse {
            brands: Vec::new(),
            total_outlets: 0,
        }));
    }

    let outlet_ids: Vec<i32> = in_range.iter().map(|(o, _)| o.id).collect();
    let links = state.availability.links_for_outlets(&outlet_ids).await?;

    let brand_ids: Vec<i32> = {
        let mut ids: Vec<i32> = links.iter().map(|l| l.brand_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };
    let brand_rows = state.brands.find_active_by_ids(&brand_ids).await?;

    let (brands, total_outlets) = group_nearby_brands(&in_range, &links, brand_rows);

    tracing::debug!(
        "Found {} brands across {} outlets",
        brands.len(),
        total_outlets
    );

    Ok(Json(NearbyBrandsResponse {
        brands,
        total_outlets,
    }))
}

/// Handler for POST /api/outlets/assign
/// Picks the best outlet to fulfill one brand's order for a customer
#[utoipa::path(
    post,
    path = "/api/outlets/assign",
    request_body = AssignOutletRequest,
    responses(
        (status = 200, description = "Best outlet for the brand", body = AssignedOutletResponse),
        (status = 400, description = "Invalid coordinate"),
        (status = 404, description = "No outlet currently serves this brand"),
        (status = 500, description = "Internal server error")
    ),
    tag = "discovery"
)]
pub async fn assign_outlet_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<AssignOutletRequest>,
) -> Result<Json<AssignedOutletResponse>, ApiError> {
    request.validate()?;
    let customer = Coordinate::new(request.latitude, request.longitude)?;

    let winner = state
        .selector
        .select_best_outlet(request.brand_id, customer, &request.items)
        .await?;

    tracing::info!(
        "Assigned outlet {} to brand {} at {:.2} km",
        winner.outlet.id,
        request.brand_id,
        winner.distance_km
    );

    Ok(Json(AssignedOutletResponse::from_candidate(winner)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn outlet(id: i32, name: &str) -> Outlet {
        Outlet {
            id,
            name: name.to_string(),
            latitude: Some(12.9),
            longitude: Some(77.6),
            is_active: true,
            delivery_available: true,
            pickup_available: true,
            delivery_radius_km: 10.0,
        }
    }

    fn brand(id: i32, name: &str) -> Brand {
        Brand {
            id,
            name: name.to_string(),
            is_active: true,
        }
    }

    fn link(outlet_id: i32, brand_id: i32) -> BrandOutletLink {
        BrandOutletLink {
            outlet_id,
            brand_id,
            is_available: true,
            preparation_time_minutes: 20,
            minimum_order_amount: dec!(0),
            delivery_fee: dec!(30),
            priority: 0,
        }
    }

    #[test]
    fn test_brands_order_on_full_precision_distance() {
        // Both nearest distances display as 4.99 km; the true values differ,
        // and the truly closer brand (the higher id) must come first.
        let in_range = vec![(outlet(1, "A"), 4.9901), (outlet(2, "B"), 4.9905)];
        let links = vec![link(1, 9), link(2, 2)];
        let brand_rows = vec![brand(2, "Second"), brand(9, "Ninth")];

        let (brands, _) = group_nearby_brands(&in_range, &links, brand_rows);

        let ids: Vec<i32> = brands.iter().map(|b| b.brand_id).collect();
        assert_eq!(ids, vec![9, 2]);
        assert_eq!(brands[0].nearest_distance_km, 4.99);
        assert_eq!(brands[1].nearest_distance_km, 4.99);
    }

    #[test]
    fn test_nearest_outlet_sets_the_brand_distance() {
        // Brand 5 is served from two outlets; the entry carries the nearer one
        let in_range = vec![(outlet(1, "Near"), 1.2), (outlet(2, "Far"), 7.8)];
        let links = vec![link(1, 5), link(2, 5)];
        let brand_rows = vec![brand(5, "Solo")];

        let (brands, total_outlets) = group_nearby_brands(&in_range, &links, brand_rows);

        assert_eq!(brands.len(), 1);
        assert_eq!(brands[0].nearest_distance_km, 1.2);
        assert_eq!(brands[0].outlets.len(), 2);
        assert_eq!(total_outlets, 2);
    }

    #[test]
    fn test_unlinked_outlets_do_not_count() {
        let in_range = vec![(outlet(1, "Linked"), 2.0), (outlet(2, "Bare"), 3.0)];
        let links = vec![link(1, 4)];
        let brand_rows = vec![brand(4, "Only")];

        let (brands, total_outlets) = group_nearby_brands(&in_range, &links, brand_rows);

        assert_eq!(total_outlets, 1);
        assert_eq!(brands.len(), 1);
    }

    #[test]
    fn test_equal_distance_brands_tie_break_on_id() {
        let in_range = vec![(outlet(1, "Shared"), 3.3)];
        let links = vec![link(1, 8), link(1, 3)];
        let brand_rows = vec![brand(8, "Eight"), brand(3, "Three")];

        let (brands, _) = group_nearby_brands(&in_range, &links, brand_rows);

        let ids: Vec<i32> = brands.iter().map(|b| b.brand_id).collect();
        assert_eq!(ids, vec![3, 8]);
    }
}
