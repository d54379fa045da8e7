// XANO backend modules
pub mod client;
pub mod records;
pub mod units;
pub mod cities;
pub mod settings;

// Re-export commonly used items
pub use client::{set_silent, XanoClient};
pub use records::{
    location_from_address, record_from_draft, record_from_unit, unit_from_record, CityRecord,
    XanoCity, XanoSetting, XanoUnit,
};
