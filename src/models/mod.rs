pub mod app_state;
pub mod current_user;
pub mod customization;
pub mod unit;
pub mod user_record;

pub use app_state::{AppState, Session};
pub use current_user::CurrentUser;
pub use customization::{Customization, DatabaseSettings, MapType};
pub use unit::{Unit, UnitDraft, UnitType, DEFAULT_COVERAGE_RADIUS_KM};
pub use user_record::{Role, UserRecord};
