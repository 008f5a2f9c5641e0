//! Geographic points: radians and ellipsoidal meters inside the crate,
//! decimal degrees only on the wire.

use foundation::math::{Ecef, Geodetic, ecef_to_geodetic, geodetic_to_ecef};
use uss::LngLat;

pub type GeoPoint = Geodetic;

pub fn from_ecef(point: Ecef) -> GeoPoint {
    ecef_to_geodetic(point)
}

pub fn to_ecef(point: GeoPoint) -> Ecef {
    geodetic_to_ecef(point)
}

/// `(lng, lat)` in decimal degrees.
pub fn to_degrees(point: GeoPoint) -> (f64, f64) {
    (point.lon_deg(), point.lat_deg())
}

pub fn to_lng_lat(point: GeoPoint) -> LngLat {
    let (lng, lat) = to_degrees(point);
    LngLat { lng, lat }
}

pub fn from_lng_lat(ll: LngLat, alt_m: f64) -> GeoPoint {
    GeoPoint::from_degrees(ll.lng, ll.lat, alt_m)
}

/// Arithmetic mean of longitude, latitude and height.
pub fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lon, alt) = points.iter().fold((0.0, 0.0, 0.0), |acc, p| {
        (acc.0 + p.lat_rad, acc.1 + p.lon_rad, acc.2 + p.alt_m)
    });
    Some(GeoPoint::new(lat / n, lon / n, alt / n))
}

/// Lowest vertex height; `0.0` when there are no vertices.
pub fn min_height(points: &[GeoPoint]) -> f64 {
    points
        .iter()
        .map(|p| p.alt_m)
        .reduce(f64::min)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_averages_all_components() {
        let pts = [
            GeoPoint::from_degrees(10.0, 20.0, 100.0),
            GeoPoint::from_degrees(12.0, 22.0, 300.0),
        ];
        let c = centroid(&pts).expect("non-empty");
        assert!((c.lon_deg() - 11.0).abs() < 1e-9);
        assert!((c.lat_deg() - 21.0).abs() < 1e-9);
        assert!((c.alt_m - 200.0).abs() < 1e-9);
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn min_height_of_empty_is_zero() {
        assert_eq!(min_height(&[]), 0.0);
        let pts = [
            GeoPoint::from_degrees(0.0, 0.0, 612.0),
            GeoPoint::from_degrees(0.0, 0.0, 598.5),
        ];
        assert_eq!(min_height(&pts), 598.5);
    }

    #[test]
    fn wire_degrees_survive_ecef() {
        let p = GeoPoint::from_degrees(-45.873938, -23.212619, 600.0);
        let ll = to_lng_lat(from_ecef(to_ecef(p)));
        assert!((ll.lng + 45.873938).abs() < 1e-9);
        assert!((ll.lat + 23.212619).abs() < 1e-9);
    }
}
