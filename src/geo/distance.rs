use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lng: f64,
}

impl Coord {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Great-circle distance between two coordinates, in kilometres.
///
/// Non-finite input yields `NaN`; callers filter invalid points first.
pub fn distance_km(a: Coord, b: Coord) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn one_degree_of_longitude_on_equator() {
        let d = distance_km(Coord::new(0.0, 0.0), Coord::new(0.0, 1.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn same_point_is_zero() {
        let paris = Coord::new(48.8566, 2.3522);
        assert_eq!(distance_km(paris, paris), 0.0);
    }

    #[test]
    fn paris_to_london() {
        let d = distance_km(Coord::new(48.8566, 2.3522), Coord::new(51.5074, -0.1278));
        assert!((d - 343.5).abs() < 1.0, "got {d}");
    }

    #[test]
    fn non_finite_input_propagates_nan() {
        let d = distance_km(Coord::new(f64::NAN, 0.0), Coord::new(0.0, 0.0));
        assert!(d.is_nan());
    }

    proptest! {
        #[test]
        fn prop_symmetric(
            lat1 in -90.0..90.0f64, lng1 in -180.0..180.0f64,
            lat2 in -90.0..90.0f64, lng2 in -180.0..180.0f64,
        ) {
            let a = Coord::new(lat1, lng1);
            let b = Coord::new(lat2, lng2);
            prop_assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
        }
    }
}
