//! Distance, bearing and area helpers on WGS84 coordinates.
//!
//! Distances use a spherical Earth (haversine); at city scale the error
//! against the ellipsoid is well under a meter per kilometer.
use crate::models::GeoPoint;

/// Mean Earth radius in meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance in meters.
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Initial compass bearing from `a` to `b` in degrees [0, 360).
/// Clockwise from north.
pub fn bearing_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let deg = y.atan2(x).to_degrees();
    if deg < 0.0 { deg + 360.0 } else { deg }
}

/// Signed turn from heading `before` to heading `after`, in (-180, 180].
/// Positive turns are to the right.
pub fn normalize_turn(before: f64, after: f64) -> f64 {
    let mut delta = (after - before) % 360.0;
    if delta <= -180.0 {
        delta += 360.0;
    } else if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Arithmetic mean of latitudes and longitudes.
pub fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat_sum, lon_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lon), p| (lat + p.latitude, lon + p.longitude));
    Some(GeoPoint::new(lat_sum / n, lon_sum / n))
}

/// Length of a polyline in meters.
pub fn path_length_m(path: &[GeoPoint]) -> f64 {
    path.windows(2).map(|w| distance_m(w[0], w[1])).sum()
}

/// Rectangular extent of the served city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceArea {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
    /// Center used when there is nothing better to show.
    pub fallback_center: GeoPoint,
    pub default_zoom: u8,
}

/// New York City, the five boroughs.
pub const NYC: ServiceArea = ServiceArea {
    south_west: GeoPoint::new(40.490064, -74.273467),
    north_east: GeoPoint::new(40.923342, -73.672258),
    fallback_center: GeoPoint::new(40.7128, -74.0060),
    default_zoom: 13,
};

impl ServiceArea {
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.latitude >= self.south_west.latitude
            && p.latitude <= self.north_east.latitude
            && p.longitude >= self.south_west.longitude
            && p.longitude <= self.north_east.longitude
    }

    /// Nearest point inside the area.
    pub fn clamp(&self, p: GeoPoint) -> GeoPoint {
        GeoPoint::new(
            p.latitude.clamp(self.south_west.latitude, self.north_east.latitude),
            p.longitude.clamp(self.south_west.longitude, self.north_east.longitude),
        )
    }
}

impl Default for ServiceArea {
    fn default() -> Self {
        NYC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_zero_for_same_point() {
        let p = GeoPoint::new(40.7128, -74.0060);
        assert_eq!(distance_m(p, p), 0.0);
    }

    #[test]
    fn test_distance_one_hundredth_degree_latitude() {
        let a = GeoPoint::new(40.70, -74.00);
        let b = GeoPoint::new(40.71, -74.00);
        // 0.01° of latitude ≈ 1111.95 m on the mean sphere
        assert!((distance_m(a, b) - 1111.95).abs() < 0.5);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(40.7580, -73.9855);
        let b = GeoPoint::new(40.6892, -74.0445);
        assert!((distance_m(a, b) - distance_m(b, a)).abs() < 1e-6);
    }

    #[test]
    fn test_distance_times_square_to_liberty_island() {
        let times_square = GeoPoint::new(40.7580, -73.9855);
        let liberty = GeoPoint::new(40.6892, -74.0445);
        let d = distance_m(times_square, liberty);
        assert!(d > 9_050.0 && d < 9_200.0, "got {d}");
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = GeoPoint::new(40.70, -74.00);
        assert!(bearing_deg(origin, GeoPoint::new(40.71, -74.00)).abs() < 1e-6);
        assert!((bearing_deg(origin, GeoPoint::new(40.69, -74.00)) - 180.0).abs() < 1e-6);
        let east = bearing_deg(origin, GeoPoint::new(40.70, -73.99));
        assert!((east - 90.0).abs() < 0.01, "got {east}");
        let west = bearing_deg(origin, GeoPoint::new(40.70, -74.01));
        assert!((west - 270.0).abs() < 0.01, "got {west}");
    }

    #[test]
    fn test_normalize_turn_wraps() {
        assert_eq!(normalize_turn(0.0, 90.0), 90.0);
        assert_eq!(normalize_turn(90.0, 0.0), -90.0);
        assert_eq!(normalize_turn(350.0, 10.0), 20.0);
        assert_eq!(normalize_turn(10.0, 350.0), -20.0);
        assert_eq!(normalize_turn(0.0, 180.0), 180.0);
        assert_eq!(normalize_turn(180.0, 0.0), 180.0);
    }

    #[test]
    fn test_centroid_mean_of_coordinates() {
        let c = centroid(&[GeoPoint::new(40.70, -74.00), GeoPoint::new(40.72, -74.02)]).unwrap();
        assert!((c.latitude - 40.71).abs() < 1e-9);
        assert!((c.longitude - -74.01).abs() < 1e-9);
    }

    #[test]
    fn test_centroid_empty() {
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn test_path_length_sums_segments() {
        let path = [
            GeoPoint::new(40.70, -74.00),
            GeoPoint::new(40.71, -74.00),
            GeoPoint::new(40.72, -74.00),
        ];
        assert!((path_length_m(&path) - 2223.9).abs() < 1.0);
        assert_eq!(path_length_m(&path[..1]), 0.0);
    }

    #[test]
    fn test_service_area_contains_and_clamps() {
        assert!(NYC.contains(NYC.fallback_center));
        let jersey_shore = GeoPoint::new(40.20, -74.50);
        assert!(!NYC.contains(jersey_shore));
        let clamped = NYC.clamp(jersey_shore);
        assert_eq!(clamped, NYC.south_west);
        let inside = GeoPoint::new(40.75, -73.98);
        assert_eq!(NYC.clamp(inside), inside);
    }
}
