//! Geography primitives: positions and great-circle distance, the embedded
//! city catalog, covered-city derivation and viewport fitting.

mod distance;
pub mod catalog;
pub mod coverage;
pub mod viewport;

pub use catalog::{fold, CityReference, StateInfo, BRAZILIAN_STATES, CITY_CATALOG};
pub use coverage::{covered_cities, covered_cities_in, format_city_label, split_city_label};
pub use distance::{distance_km, Position, EARTH_RADIUS_KM};
pub use viewport::{fit_bounds, zoom_for_spread, ViewportFit, DEFAULT_CENTER, DEFAULT_ZOOM};
