use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::availability::BrandOutletLink;
use crate::models::Outlet;

/// A candidate outlet for one brand: the outlet, its link terms, and the
/// full-precision distance from the customer coordinate
#[derive(Debug, Clone)]
pub struct OutletWithLink {
    pub outlet: Outlet,
    pub link: BrandOutletLink,
    pub distance_km: f64,
}

/// Query parameters for GET /api/brands/nearby
#[derive(Debug, Deserialize, Validate, utoipa::IntoParams)]
pub struct NearbyBrandsQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
    /// Search radius in kilometres (default 10)
    #[serde(default = "default_radius_km")]
    #[validate(custom = "crate::validation::validate_radius_km")]
    pub radius_km: f64,
}

fn default_radius_km() -> f64 {
    10.0
}

/// One servable outlet inside a nearby-brand entry
#[derive(Debug, Serialize, ToSchema)]
pub struct NearbyOutletSummary {
    pub outlet_id: i32,
    pub outlet_name: String,
    /// Distance rounded to 2 decimal places for display
    pub distance_km: f64,
    pub preparation_time_minutes: i32,
    #[schema(value_type = f64)]
    pub minimum_order_amount: Decimal,
    #[schema(value_type = f64)]
    pub delivery_fee: Decimal,
}

/// A brand servable near the customer, with its in-range outlets
#[derive(Debug, Serialize, ToSchema)]
pub struct NearbyBrand {
    pub brand_id: i32,
    pub brand_name: String,
    /// Distance to the closest outlet serving this brand, 2 dp
    pub nearest_distance_km: f64,
    pub outlets: Vec<NearbyOutletSummary>,
}

/// Response body for GET /api/brands/nearby
#[derive(Debug, Serialize, ToSchema)]
pub struct NearbyBrandsResponse {
    pub brands: Vec<NearbyBrand>,
    /// Distinct in-range outlets carrying at least one available brand link
    pub total_outlets: usize,
}

/// A requested line item, reserved for stock-aware selection
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssignItem {
    pub menu_item_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Request body for POST /api/outlets/assign
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignOutletRequest {
    pub brand_id: i32,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
    /// Items in the prospective order; accepted for future stock-aware
    /// scoring, not consulted by the current policy
    #[serde(default)]
    pub items: Vec<AssignItem>,
}

/// Response body for POST /api/outlets/assign
#[derive(Debug, Serialize, ToSchema)]
pub struct AssignedOutletResponse {
    pub outlet: Outlet,
    /// Distance rounded to 2 decimal places for display
    pub distance_km: f64,
    pub preparation_time_minutes: i32,
    #[schema(value_type = f64)]
    pub minimum_order_amount: Decimal,
    #[schema(value_type = f64)]
    pub delivery_fee: Decimal,
    pub priority: i32,
}

impl AssignedOutletResponse {
    pub fn from_candidate(candidate: OutletWithLink) -> Self {
        Self {
            distance_km: crate::geo::round_km_for_display(candidate.distance_km),
            preparation_time_minutes: candidate.link.preparation_time_minutes,
            minimum_order_amount: candidate.link.minimum_order_amount,
            delivery_fee: candidate.link.delivery_fee,
            priority: candidate.link.priority,
            outlet: candidate.outlet,
        }
    }
}
