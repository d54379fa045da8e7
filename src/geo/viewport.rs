use serde::Serialize;

use super::distance::Position;

/// Center used when there is nothing to fit (Patos de Minas, MG).
pub const DEFAULT_CENTER: Position = Position::new(-18.5833, -46.5167);
pub const DEFAULT_ZOOM: u8 = 7;

/// A map center plus a discrete zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportFit {
    pub center: Position,
    pub zoom: u8,
}

impl Default for ViewportFit {
    fn default() -> Self {
        ViewportFit {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// Zoom step table keyed by the larger of the latitude/longitude ranges, in degrees.
pub fn zoom_for_spread(spread: f64) -> u8 {
    if spread < 0.5 {
        12
    } else if spread < 1.0 {
        10
    } else if spread < 2.0 {
        9
    } else if spread < 4.0 {
        8
    } else if spread < 8.0 {
        7
    } else {
        6
    }
}

/// Frames `positions` by their bounding box.
///
/// The center is the midpoint of the box, not the centroid of the points, so
/// the result does not depend on input order or on duplicate points.
pub fn fit_bounds(positions: &[Position]) -> ViewportFit {
    let Some(first) = positions.first() else {
        return ViewportFit::default();
    };
    let (mut min_lat, mut max_lat) = (first.lat, first.lat);
    let (mut min_lng, mut max_lng) = (first.lng, first.lng);
    for p in &positions[1..] {
        min_lat = min_lat.min(p.lat);
        max_lat = max_lat.max(p.lat);
        min_lng = min_lng.min(p.lng);
        max_lng = max_lng.max(p.lng);
    }
    let spread = (max_lat - min_lat).max(max_lng - min_lng);
    ViewportFit {
        center: Position::new((min_lat + max_lat) / 2.0, (min_lng + max_lng) / 2.0),
        zoom: zoom_for_spread(spread),
    }
}
