//! Map view orchestration: the per-visitor controller, the JSON intents that
//! drive it and the session store holding one controller per visitor.

pub mod control;
pub mod intent;
pub mod presets;
pub mod sessions;

pub use control::{MapController, MapViewState, CITY_MIN_ZOOM, STATE_FALLBACK_ZOOM, UNIT_FOCUS_ZOOM};
pub use intent::{MapIntent, UnknownUnit};
pub use presets::state_view;
pub use sessions::MapSessionStore;
