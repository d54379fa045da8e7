use askama::Template;

use crate::handlers::helpers::TemplateGlobals;
use crate::models::Unit;

/// One line of the admin unit table.
pub struct UnitRow {
    pub id: i64,
    pub name: String,
    pub kind: &'static str,
    pub location: String,
    pub phone: String,
    pub email: String,
    pub radius: String,
    pub covered_count: usize,
    pub show_coverage: bool,
}

impl UnitRow {
    pub fn from_unit(unit: &Unit) -> Self {
        let location = match (unit.city.as_deref(), unit.state.as_deref()) {
            (Some(c), Some(s)) => format!("{}, {}", c, s),
            (Some(c), None) => c.to_string(),
            (None, Some(s)) => s.to_string(),
            (None, None) => unit.address.clone(),
        };
        UnitRow {
            id: unit.id,
            name: unit.name.clone(),
            kind: unit.kind.as_str(),
            location,
            phone: unit.phone.clone(),
            email: unit.email.clone(),
            radius: unit
                .coverage_radius
                .map(|r| format!("{} km", r))
                .unwrap_or_else(|| "-".into()),
            covered_count: unit.covered_cities.len(),
            show_coverage: unit.show_coverage,
        }
    }
}

#[derive(Template)]
#[template(path = "admin_units.html")]
pub struct AdminUnitsTemplate {
    pub globals: TemplateGlobals,
    pub rows: Vec<UnitRow>,
    pub can_delete: bool,
    pub can_configure: bool,
}
