// Geodesic distance module
// Single home for coordinate validation and great-circle distance; every
// caller that needs "how far is this outlet" goes through here.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres, used by the Haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Error raised when a latitude/longitude pair is non-finite or out of range
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
pub struct InvalidCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A validated geographic coordinate
///
/// Construction goes through [`Coordinate::new`], which rejects NaN,
/// infinities, and values outside [-90, 90] / [-180, 180]. Once a
/// `Coordinate` exists, distance computation cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Validate and build a coordinate
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if !lat_ok || !lon_ok {
            return Err(InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a coordinate from nullable database columns
    ///
    /// Returns `None` when either part is missing or the pair does not
    /// validate; rows with broken coordinates are skipped, not treated as 0/0.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Coordinate::new(lat, lon).ok(),
            _ => None,
        }
    }
}

/// Great-circle distance between two coordinates in kilometres
///
/// Haversine formula over a sphere of radius [`EARTH_RADIUS_KM`]. The result
/// is full precision; callers round for display with
/// [`round_km_for_display`] but must rank/compare on the raw value.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Round a distance to two decimal places for response payloads
pub fn round_km_for_display(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
