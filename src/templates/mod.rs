// Page templates
pub mod admin_units_template;
pub mod login_template;
pub mod map_template;
pub mod settings_template;
pub mod unit_form_template;

// Re-export all templates
pub use admin_units_template::{AdminUnitsTemplate, UnitRow};
pub use login_template::LoginTemplate;
pub use map_template::{MapTemplate, Notice};
pub use settings_template::SettingsTemplate;
pub use unit_form_template::{UnitFormTemplate, UnitFormValues};
