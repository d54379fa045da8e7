pub mod api;
pub mod config;
pub mod error;
pub mod geo;
pub mod handlers;
pub mod map;
pub mod models;
pub mod routes;
pub mod services;
pub mod templates;
pub mod utils;
