use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the Haversine formula, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
///
/// Serialized as a `[lat, lng]` array, which is the shape the map widgets and
/// the unit records use on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both coordinates are finite and inside the usual WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for Position {
    fn from(pair: [f64; 2]) -> Self {
        Position::new(pair[0], pair[1])
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.lat, p.lng]
    }
}

/// Great-circle distance between two positions, in kilometers.
pub fn distance_km(a: Position, b: Position) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h slightly past 1.0 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sao_paulo_to_rio() {
        let sp = Position::new(-23.5505, -46.6333);
        let rj = Position::new(-22.9068, -43.1729);
        let d = distance_km(sp, rj);
        assert!((d - 360.75).abs() < 0.5, "got {}", d);
    }

    #[test]
    fn antipodal_points_stay_finite() {
        let d = distance_km(Position::new(0.0, 0.0), Position::new(0.0, 180.0));
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn position_serializes_as_pair() {
        let json = serde_json::to_string(&Position::new(-21.25, -45.0)).unwrap();
        assert_eq!(json, "[-21.25,-45.0]");
        let back: Position = serde_json::from_str("[-21.25,-45.0]").unwrap();
        assert_eq!(back, Position::new(-21.25, -45.0));
    }

    #[test]
    fn validity_bounds() {
        assert!(Position::new(-90.0, 180.0).is_valid());
        assert!(!Position::new(91.0, 0.0).is_valid());
        assert!(!Position::new(0.0, f64::NAN).is_valid());
    }
}
