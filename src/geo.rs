// Geodesy math for hunt navigation.
//
// Haversine distance, initial great-circle bearing, compass-octant
// quantization. Angles in degrees, distances in meters.

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// The eight compass octants, each covering 45 degrees of bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Octant {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Octant {
    /// Quantize a bearing to an octant. Each octant spans 45 degrees
    /// centered on its cardinal bearing; a boundary (22.5, 67.5, ...)
    /// belongs to the clockwise-next octant.
    pub fn from_bearing(degrees: f64) -> Octant {
        const OCTANTS: [Octant; 8] = [
            Octant::North,
            Octant::NorthEast,
            Octant::East,
            Octant::SouthEast,
            Octant::South,
            Octant::SouthWest,
            Octant::West,
            Octant::NorthWest,
        ];
        let deg = degrees.rem_euclid(360.0);
        OCTANTS[((deg + 22.5) / 45.0) as usize % 8]
    }

    /// Octant pointing from one coordinate toward another, or None when
    /// the points coincide and the bearing is undefined.
    pub fn from_points(from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> Option<Octant> {
        if from_lat == to_lat && from_lon == to_lon {
            return None;
        }
        Some(Octant::from_bearing(initial_bearing_degrees(
            from_lat, from_lon, to_lat, to_lon,
        )))
    }
}

/// Great-circle distance between two coordinates in meters (haversine).
pub fn distance_meters(from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> f64 {
    let lat1 = from_lat.to_radians();
    let lat2 = to_lat.to_radians();
    let dlat = (to_lat - from_lat).to_radians();
    let dlon = (to_lon - from_lon).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Initial bearing from one coordinate toward another, in [0, 360).
pub fn initial_bearing_degrees(from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> f64 {
    let lat1 = from_lat.to_radians();
    let lat2 = to_lat.to_radians();
    let dlon = (to_lon - from_lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Whether a distance is within the arrival radius.
pub fn is_arrived(distance_m: f64, radius_m: f64) -> bool {
    distance_m <= radius_m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_zero_for_same_point() {
        assert_eq!(distance_meters(55.75, 37.62, 55.75, 37.62), 0.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let d1 = distance_meters(55.75, 37.62, 59.94, 30.31);
        let d2 = distance_meters(59.94, 30.31, 55.75, 37.62);
        assert!((d1 - d2).abs() < 1e-6);
    }

    #[test]
    fn test_distance_hundredth_degree_east_at_equator() {
        // 0.01 deg of longitude at the equator is roughly 1113 m
        let d = distance_meters(0.0, 0.0, 0.0, 0.01);
        assert!((d - 1113.0).abs() / 1113.0 < 0.01);
    }

    #[test]
    fn test_bearing_due_east() {
        let b = initial_bearing_degrees(0.0, 0.0, 0.0, 0.01);
        assert!((b - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_bearing_due_north() {
        let b = initial_bearing_degrees(0.0, 0.0, 0.01, 0.0);
        assert!(b.abs() < 0.01);
    }

    #[test]
    fn test_bearing_normalized() {
        // due west would be -90 before normalization
        let b = initial_bearing_degrees(0.0, 0.01, 0.0, 0.0);
        assert!((b - 270.0).abs() < 0.01);
        assert!((0.0..360.0).contains(&b));
    }

    #[test]
    fn test_octant_cardinal_bearings() {
        assert_eq!(Octant::from_bearing(0.0), Octant::North);
        assert_eq!(Octant::from_bearing(45.0), Octant::NorthEast);
        assert_eq!(Octant::from_bearing(90.0), Octant::East);
        assert_eq!(Octant::from_bearing(135.0), Octant::SouthEast);
        assert_eq!(Octant::from_bearing(180.0), Octant::South);
        assert_eq!(Octant::from_bearing(225.0), Octant::SouthWest);
        assert_eq!(Octant::from_bearing(270.0), Octant::West);
        assert_eq!(Octant::from_bearing(315.0), Octant::NorthWest);
    }

    #[test]
    fn test_octant_boundaries_go_clockwise() {
        // a boundary bearing belongs to the next octant
        assert_eq!(Octant::from_bearing(22.5), Octant::NorthEast);
        assert_eq!(Octant::from_bearing(22.4), Octant::North);
        assert_eq!(Octant::from_bearing(337.5), Octant::North);
        assert_eq!(Octant::from_bearing(337.4), Octant::NorthWest);
    }

    #[test]
    fn test_octant_wraps_near_north() {
        assert_eq!(Octant::from_bearing(350.0), Octant::North);
        assert_eq!(Octant::from_bearing(360.0), Octant::North);
        assert_eq!(Octant::from_bearing(-10.0), Octant::North);
    }

    #[test]
    fn test_octant_from_points_east() {
        let o = Octant::from_points(0.0, 0.0, 0.0, 0.01);
        assert_eq!(o, Some(Octant::East));
    }

    #[test]
    fn test_octant_coincident_points_undefined() {
        assert_eq!(Octant::from_points(1.0, 2.0, 1.0, 2.0), None);
    }

    #[test]
    fn test_is_arrived_at_boundary() {
        assert!(is_arrived(200.0, 200.0));
        assert!(is_arrived(199.9, 200.0));
        assert!(!is_arrived(200.1, 200.0));
    }
}
