// Core domain rows shared across modules
// Outlets and brands are platform-owned; addresses and menu items are read
// here only to resolve checkouts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::geo::Coordinate;

/// A physical kitchen location capable of preparing and dispatching orders
///
/// Outlets are soft-deactivated (`is_active = false`), never hard-deleted.
/// Coordinates are nullable: an outlet without a usable coordinate simply
/// never appears in distance-based results.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Outlet {
    pub id: i32,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,
    pub delivery_available: bool,
    pub pickup_available: bool,
    pub delivery_radius_km: f64,
}

impl Outlet {
    /// The outlet's validated coordinate, if both columns are present and sane
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }
}

/// A virtual storefront brand, independent of any single outlet
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Brand {
    pub id: i32,
    pub name: String,
    pub is_active: bool,
}

/// A menu item belonging to one brand; `price` is the base price before any
/// per-outlet override
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuItem {
    pub id: i32,
    pub brand_id: i32,
    pub name: String,
    pub price: Decimal,
    pub is_active: bool,
}

/// A customer delivery address
///
/// Latitude/longitude may be null for addresses captured without geocoding;
/// such an address cannot be used for outlet assignment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Address {
    pub id: i32,
    pub user_id: i32,
    pub line1: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Address {
    /// The address coordinate, if geocoded and valid
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outlet(lat: Option<f64>, lon: Option<f64>) -> Outlet {
        Outlet {
            id: 1,
            name: "HSR Kitchen".to_string(),
            latitude: lat,
            longitude: lon,
            is_active: true,
            delivery_available: true,
            pickup_available: true,
            delivery_radius_km: 10.0,
        }
    }

    #[test]
    fn test_outlet_coordinate_present() {
        let o = outlet(Some(12.9), Some(77.6));
        assert!(o.coordinate().is_some());
    }

    #[test]
    fn test_outlet_coordinate_missing_column() {
        assert!(outlet(None, Some(77.6)).coordinate().is_none());
        assert!(outlet(Some(12.9), None).coordinate().is_none());
    }

    #[test]
    fn test_outlet_coordinate_invalid_values() {
        // A corrupted row must not silently become (0, 0)
        assert!(outlet(Some(123.0), Some(77.6)).coordinate().is_none());
        assert!(outlet(Some(f64::NAN), Some(77.6)).coordinate().is_none());
    }
}
