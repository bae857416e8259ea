//! Geographic coordinates and spherical distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic point in decimal degrees.
///
/// Stored as `Option<GeoPoint>` on every entity that may carry coordinates:
/// a point is only present when real coordinates are known, never defaulted
/// to (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Haversine distance in kilometers between two points.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Haversine distance in meters between two points.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        self.distance_km(other) * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_same_point() {
        let p = GeoPoint::new(3.3792, 6.5244);
        assert!(p.distance_km(&p).abs() < 0.001);
    }

    #[test]
    fn test_distance_lagos_to_abuja() {
        // Lagos Island to Abuja city centre is ~520 km
        let lagos = GeoPoint::new(3.3792, 6.5244);
        let abuja = GeoPoint::new(7.4951, 9.0579);
        let dist = lagos.distance_km(&abuja);
        assert!((dist - 520.0).abs() < 30.0);
    }

    #[test]
    fn test_distance_meters() {
        let a = GeoPoint::new(3.3792, 6.5244);
        let b = GeoPoint::new(3.3892, 6.5244);
        let km = a.distance_km(&b);
        assert!((a.distance_m(&b) - km * 1000.0).abs() < 1e-9);
    }
}
