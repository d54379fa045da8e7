pub mod cache;
pub mod file_store;
pub mod unit_service;
pub mod settings_service;
pub mod location_service;
pub mod geocoding_service;
pub mod user_service;

// Re-export commonly used items
pub use cache::TtlCache;
pub use file_store::write_file_atomic;
pub use geocoding_service::{GeocodeResult, GeocodeSource, GeocodingService, GEOCODE_FALLBACK};
pub use location_service::{covered_city_options, states_with_units, CityMatch, LocationService, StateEntry};
pub use settings_service::SettingsStore;
pub use unit_service::{demo_units, UnitBackend, UnitStore};
pub use user_service::{
    add_user, authenticate, deactivate_user, generate_password_hash, load_users_from_file,
    persist_users_file, random_session_id, reset_password, verify_password, UserMap,
};
