use askama::Template;

use crate::handlers::helpers::TemplateGlobals;
use crate::models::Unit;

/// A one-line message shown above the unit list.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub level: &'static str,
    pub text: String,
}

impl Notice {
    pub fn success(text: String) -> Self {
        Notice { level: "success", text }
    }

    pub fn warning(text: String) -> Self {
        Notice { level: "warning", text }
    }
}

#[derive(Template)]
#[template(path = "map.html")]
pub struct MapTemplate {
    pub globals: TemplateGlobals,
    pub states: Vec<String>,
    pub selected_state: String,
    pub cities: Vec<String>,
    pub selected_city: String,
    pub total_units: usize,
    pub units: Vec<Unit>,
    pub notice: Option<Notice>,
    pub map_config_json: String,
}
