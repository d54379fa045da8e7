use askama::Template;

use crate::handlers::helpers::TemplateGlobals;
use crate::models::{UnitDraft, UnitType};

/// Field values echoed back into the unit form.
#[derive(Clone, Debug, Default)]
pub struct UnitFormValues {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub description: String,
    pub photo: String,
    pub latitude: String,
    pub longitude: String,
    pub kind: UnitType,
    pub coverage_radius: String,
    pub show_coverage: bool,
    pub state: String,
    pub city: String,
}

impl UnitFormValues {
    pub fn from_draft(d: &UnitDraft) -> Self {
        UnitFormValues {
            name: d.name.clone(),
            address: d.address.clone(),
            phone: d.phone.clone(),
            email: d.email.clone(),
            website: d.website.clone(),
            description: d.description.clone(),
            photo: d.photo.clone(),
            latitude: d.latitude.to_string(),
            longitude: d.longitude.to_string(),
            kind: d.kind,
            coverage_radius: d.coverage_radius.map(|r| r.to_string()).unwrap_or_default(),
            show_coverage: d.show_coverage,
            state: d.state.clone().unwrap_or_default(),
            city: d.city.clone().unwrap_or_default(),
        }
    }

    pub fn is_headquarters(&self) -> bool {
        self.kind == UnitType::Headquarters
    }
}

#[derive(Template)]
#[template(path = "unit_form.html")]
pub struct UnitFormTemplate {
    pub globals: TemplateGlobals,
    pub title: String,
    pub action: String,
    pub values: UnitFormValues,
    pub error: Option<String>,
}
