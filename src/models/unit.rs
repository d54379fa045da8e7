use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::geo::{covered_cities, fold, split_city_label, Position};

/// Radius assigned to units created without one, in kilometers.
pub const DEFAULT_COVERAGE_RADIUS_KM: f64 = 50.0;

/// Whether a unit is the network's headquarters or a regional branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitType {
    #[serde(rename = "Sede Principal")]
    Headquarters,
    #[serde(rename = "Unidade Regional")]
    Regional,
}

impl UnitType {
    /// Value stored by the backend and shown in the UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Headquarters => "Sede Principal",
            UnitType::Regional => "Unidade Regional",
        }
    }

    /// Accepts the stored label or the short form used by the CLI.
    pub fn parse(s: &str) -> Option<UnitType> {
        match s.trim() {
            "Sede Principal" | "headquarters" | "hq" => Some(UnitType::Headquarters),
            "Unidade Regional" | "regional" => Some(UnitType::Regional),
            _ => None,
        }
    }
}

impl Default for UnitType {
    fn default() -> Self {
        UnitType::Regional
    }
}

/// A service location shown on the map.
///
/// `covered_cities` is derived from `position` and `coverage_radius`; call
/// [`Unit::refresh_coverage`] after touching either.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photo: String,
    pub position: Position,
    #[serde(rename = "type", default)]
    pub kind: UnitType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_radius: Option<f64>,
    #[serde(default)]
    pub show_coverage: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default)]
    pub covered_cities: Vec<String>,
}

impl Unit {
    pub fn refresh_coverage(&mut self) {
        self.covered_cities = covered_cities(self.position, self.coverage_radius);
    }

    pub fn in_state(&self, state: &str) -> bool {
        match &self.state {
            Some(s) => s.trim().eq_ignore_ascii_case(state.trim()),
            None => false,
        }
    }

    /// True when the unit sits in `city` or lists it among its covered
    /// cities. When `state` is given, a covered label must name that state.
    pub fn serves_city(&self, city: &str, state: Option<&str>) -> bool {
        let wanted = fold(city);
        if wanted.is_empty() {
            return false;
        }
        let state = state.map(str::trim).filter(|s| !s.is_empty());
        let home = self.city.as_deref().map(fold).as_deref() == Some(wanted.as_str());
        if home && state.map_or(true, |s| self.in_state(s)) {
            return true;
        }
        self.covered_cities.iter().any(|label| {
            let (name, label_state) = split_city_label(label);
            fold(name) == wanted
                && match (state, label_state) {
                    (Some(s), Some(ls)) => ls.trim().eq_ignore_ascii_case(s),
                    _ => true,
                }
        })
    }
}

/// Editable fields of a unit, as submitted by the admin form or the CLI.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitDraft {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub description: String,
    pub photo: String,
    pub latitude: f64,
    pub longitude: f64,
    pub kind: UnitType,
    pub coverage_radius: Option<f64>,
    pub show_coverage: bool,
    pub state: Option<String>,
    pub city: Option<String>,
}

impl UnitDraft {
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push("name is required");
        }
        if self.email.trim().is_empty() {
            problems.push("email is required");
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            problems.push("latitude must be between -90 and 90");
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            problems.push("longitude must be between -180 and 180");
        }
        if let Some(r) = self.coverage_radius {
            if !r.is_finite() || r < 0.0 {
                problems.push("coverage radius must be a non-negative number");
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Invalid(problems.join("; ")))
        }
    }

    pub fn into_unit(self, id: i64) -> Unit {
        let mut unit = Unit {
            id,
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            website: self.website.trim().to_string(),
            description: self.description,
            photo: self.photo,
            position: Position::new(self.latitude, self.longitude),
            kind: self.kind,
            coverage_radius: self.coverage_radius,
            show_coverage: self.show_coverage,
            state: non_empty(self.state).map(|s| s.to_uppercase()),
            city: non_empty(self.city),
            covered_cities: Vec::new(),
        };
        unit.refresh_coverage();
        unit
    }

    pub fn from_unit(unit: &Unit) -> Self {
        UnitDraft {
            name: unit.name.clone(),
            address: unit.address.clone(),
            phone: unit.phone.clone(),
            email: unit.email.clone(),
            website: unit.website.clone(),
            description: unit.description.clone(),
            photo: unit.photo.clone(),
            latitude: unit.position.lat,
            longitude: unit.position.lng,
            kind: unit.kind,
            coverage_radius: unit.coverage_radius,
            show_coverage: unit.show_coverage,
            state: unit.state.clone(),
            city: unit.city.clone(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> UnitDraft {
        UnitDraft {
            name: "Lavras".into(),
            email: "lavras@example.com".into(),
            latitude: -21.25,
            longitude: -45.0,
            coverage_radius: Some(30.0),
            state: Some(" mg ".into()),
            city: Some("Lavras".into()),
            ..Default::default()
        }
    }

    #[test]
    fn into_unit_derives_coverage_and_normalizes_state() {
        let unit = draft().into_unit(7);
        assert_eq!(unit.id, 7);
        assert_eq!(unit.state.as_deref(), Some("MG"));
        assert!(unit.covered_cities.contains(&"Lavras, MG".to_string()));
    }

    #[test]
    fn validate_reports_every_problem() {
        let bad = UnitDraft {
            latitude: 120.0,
            coverage_radius: Some(-1.0),
            ..Default::default()
        };
        let err = bad.validate().unwrap_err().to_string();
        assert!(err.contains("name is required"));
        assert!(err.contains("email is required"));
        assert!(err.contains("latitude"));
        assert!(err.contains("coverage radius"));
    }

    #[test]
    fn serves_city_matches_home_or_covered() {
        let unit = draft().into_unit(1);
        assert!(unit.serves_city("lavras", None));
        assert!(unit.serves_city("lavras", Some("MG")));
        assert!(!unit.serves_city("Manaus", None));
        assert!(!unit.serves_city("  ", None));
    }

    #[test]
    fn serves_city_respects_covered_label_state() {
        let mut unit = draft().into_unit(1);
        unit.covered_cities = vec!["Franca, SP".into(), "Lavras, MG".into()];
        assert!(unit.serves_city("Franca", None));
        assert!(unit.serves_city("franca", Some("sp")));
        assert!(!unit.serves_city("Franca", Some("MG")));
        assert!(!unit.serves_city("Lavras", Some("SP")));
    }

    #[test]
    fn unit_type_wire_labels() {
        let json = serde_json::to_string(&UnitType::Headquarters).unwrap();
        assert_eq!(json, "\"Sede Principal\"");
        assert_eq!(UnitType::parse("regional"), Some(UnitType::Regional));
        assert_eq!(UnitType::parse("kiosk"), None);
    }
}
