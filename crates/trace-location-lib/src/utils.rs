//! Utility functions for coordinate conversions, spatial reference codes and units

use geo::Coord;

/// Well-known id of geographic WGS84
pub const WKID_WGS84: i32 = 4326;

/// Well-known id of Web Mercator (EPSG:3857)
pub const WKID_WEB_MERCATOR: i32 = 3857;

/// Legacy Esri ids that describe the same Web Mercator projection
pub const WKID_WEB_MERCATOR_ALIASES: [i32; 2] = [102100, 102113];

/// Web Mercator bounds in meters (EPSG:3857)
pub const EARTH_MERCATOR_MAX: f64 = 20037508.34;
pub const EARTH_MERCATOR_MIN: f64 = -20037508.34;

/// Maximum latitude that can be represented in Web Mercator
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Mean Earth radius in meters, used for geodesic approximations
pub const EARTH_RADIUS_M: f64 = 6371008.8;

/// Meters in one international foot
pub const METERS_PER_FOOT: f64 = 0.3048;

const LON_TO_X_FACTOR: f64 = EARTH_MERCATOR_MAX / 180.0;
const Y_FACTOR: f64 = EARTH_MERCATOR_MAX / std::f64::consts::PI;
const X_TO_LON_FACTOR: f64 = 180.0 / EARTH_MERCATOR_MAX;
const Y_TO_LAT_FACTOR: f64 = std::f64::consts::PI / EARTH_MERCATOR_MAX;

/// Whether the wkid names Web Mercator, including its legacy Esri aliases
#[inline]
pub fn is_web_mercator(wkid: i32) -> bool {
    wkid == WKID_WEB_MERCATOR || WKID_WEB_MERCATOR_ALIASES.contains(&wkid)
}

/// Convert a WGS84 coordinate (x = longitude, y = latitude) to Web Mercator meters
///
/// Latitude is clamped to the range Web Mercator can represent.
#[inline(always)]
pub fn wgs84_to_mercator(coord: Coord<f64>) -> Coord<f64> {
    let lat = coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let lat_rad = lat.to_radians();
    Coord {
        x: coord.x * LON_TO_X_FACTOR,
        y: (lat_rad.tan() + (1.0 / lat_rad.cos())).ln() * Y_FACTOR,
    }
}

/// Convert a Web Mercator coordinate in meters to WGS84 (x = longitude, y = latitude)
#[inline(always)]
pub fn mercator_to_wgs84(coord: Coord<f64>) -> Coord<f64> {
    Coord {
        x: coord.x * X_TO_LON_FACTOR,
        y: (std::f64::consts::PI / 2.0 - 2.0 * ((-coord.y * Y_TO_LAT_FACTOR).exp()).atan())
            .to_degrees(),
    }
}

/// Check if a coordinate is within Web Mercator bounds
#[inline(always)]
pub fn is_valid_mercator(coord: Coord<f64>) -> bool {
    (EARTH_MERCATOR_MIN..=EARTH_MERCATOR_MAX).contains(&coord.x)
        && (EARTH_MERCATOR_MIN..=EARTH_MERCATOR_MAX).contains(&coord.y)
}

/// Web Mercator scale factor at a latitude: mercator meters per ground meter
#[inline]
pub fn mercator_scale_factor(latitude: f64) -> f64 {
    1.0 / latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians().cos()
}

/// Ground meters covered by one degree of latitude
#[inline]
pub fn meters_per_degree() -> f64 {
    EARTH_RADIUS_M * std::f64::consts::PI / 180.0
}

/// Coordinate equality within an absolute tolerance on each axis
#[inline]
pub fn coords_equal(a: Coord<f64>, b: Coord<f64>, tolerance: f64) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_to_mercator_origin() {
        let coord = wgs84_to_mercator(Coord { x: 0.0, y: 0.0 });
        assert!(coord.x.abs() < 0.01);
        assert!(coord.y.abs() < 0.01);
    }

    #[test]
    fn test_wgs84_to_mercator_bounds() {
        let west = wgs84_to_mercator(Coord { x: -180.0, y: 0.0 });
        assert!((west.x - EARTH_MERCATOR_MIN).abs() < 1.0);

        let east = wgs84_to_mercator(Coord { x: 180.0, y: 0.0 });
        assert!((east.x - EARTH_MERCATOR_MAX).abs() < 1.0);
    }

    #[test]
    fn test_mercator_to_wgs84_roundtrip() {
        let original = Coord {
            x: -117.1956,
            y: 34.0572,
        };
        let back = mercator_to_wgs84(wgs84_to_mercator(original));

        assert!((original.x - back.x).abs() < 1e-9);
        assert!((original.y - back.y).abs() < 1e-9);
    }

    #[test]
    fn test_is_valid_mercator() {
        assert!(is_valid_mercator(Coord { x: 0.0, y: 0.0 }));
        assert!(!is_valid_mercator(Coord {
            x: EARTH_MERCATOR_MAX + 1.0,
            y: 0.0
        }));
    }

    #[test]
    fn test_web_mercator_aliases() {
        assert!(is_web_mercator(3857));
        assert!(is_web_mercator(102100));
        assert!(!is_web_mercator(WKID_WGS84));
    }

    #[test]
    fn test_scale_factor_grows_with_latitude() {
        assert!((mercator_scale_factor(0.0) - 1.0).abs() < f64::EPSILON);
        assert!((mercator_scale_factor(60.0) - 2.0).abs() < 1e-9);
    }
}
