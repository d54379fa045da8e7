// URL handling utilities
pub mod url_parser;

// Parsing utilities
pub mod parse_flag;
pub mod parse_number;

// Re-export all utilities for convenient access
pub use parse_flag::parse_flag;
pub use parse_number::{parse_optional_f64, parse_optional_int};
pub use url_parser::hostname_from_url;
