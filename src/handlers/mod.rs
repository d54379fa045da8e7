// Handler modules
pub mod auth;
pub mod helpers;
pub mod locations;
pub mod map;
pub mod middleware;
pub mod settings;
pub mod units;

// Re-export route handlers
pub use auth::{login_get, login_post, logout_post};
pub use locations::{api_city_search, api_coverage, api_covered_cities, api_geocode, api_state_cities, api_states};
pub use map::{api_map_get, api_map_post, index_get};
pub use settings::{settings_get, settings_post, settings_test_database};
pub use units::{
    admin_index, api_unit_get, api_units_list, unit_create_post, unit_delete_post, unit_edit_get,
    unit_new_get, unit_update_post, units_refresh_post,
};
